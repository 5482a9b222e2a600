//! Errors raised by the network adapters.

use hestia_domain::error::HestiaError;

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0} is not supported by this bridge client")]
    Unsupported(&'static str),
}

impl From<NetworkError> for HestiaError {
    fn from(err: NetworkError) -> Self {
        Self::adapter("bridge", err)
    }
}
