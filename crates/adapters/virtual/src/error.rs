//! Errors raised by the virtual adapters.

use std::net::IpAddr;

use hestia_domain::error::HestiaError;

#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    #[error("no bridge at {0}")]
    UnknownBridge(IpAddr),

    #[error("pairing rejected: link button not pressed")]
    PairingRejected,

    #[error("bridge has no light '{0}'")]
    UnknownLight(String),

    #[error("media keys are unavailable")]
    MediaUnavailable,
}

impl VirtualError {
    /// Convert into the workspace error, tagged with the adapter it came from.
    pub fn into_hestia(self, adapter: &'static str) -> HestiaError {
        HestiaError::adapter(adapter, self)
    }
}
