//! Error taxonomy shared across the workspace.
//!
//! Call-level failures (`SceneNotFound`, `NoMatchingDevice`, a direct
//! `DeviceNotFound` query) are returned as `Err`. Per-device and per-action
//! failures use the same variants but are captured inline in aggregated
//! reports instead of aborting the call.

use std::time::Duration;

use crate::device::{Capability, DeviceKind};
use crate::id::DeviceId;
use crate::selector::Selector;

/// Boxed source error carried by adapter failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Base error type for the whole workspace.
#[derive(Debug, thiserror::Error)]
pub enum HestiaError {
    /// A device with this id is already registered.
    #[error("device id '{0}' is already registered")]
    DuplicateId(DeviceId),

    /// No device with this id is registered.
    #[error("device '{0}' not found")]
    DeviceNotFound(DeviceId),

    /// The device lacks the capability the command requires.
    #[error("{device} does not support {capability}")]
    CapabilityUnsupported {
        device: String,
        capability: Capability,
    },

    /// The selector matched no registered device.
    #[error("no {kind} device matches '{selector}'")]
    NoMatchingDevice {
        kind: DeviceKind,
        selector: Selector,
    },

    /// The color name is not part of the palette, or the target platform
    /// has no mapping for it.
    #[error("unknown color: {0}")]
    UnknownColor(String),

    /// No scene with this name exists.
    #[error("scene '{0}' not found")]
    SceneNotFound(String),

    /// A bridge or media-key call failed.
    #[error("{adapter} adapter call failed: {source}")]
    PlatformAdapter {
        adapter: &'static str,
        #[source]
        source: BoxError,
    },

    /// The discovery session hit its overall time bound. Informational:
    /// the session still returns whatever was found before the bound.
    #[error("discovery stopped after the {0:?} session timeout")]
    DiscoveryTimeout(Duration),

    /// A domain invariant was violated while building a value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl HestiaError {
    /// Wrap an adapter-specific error.
    pub fn adapter(adapter: &'static str, source: impl Into<BoxError>) -> Self {
        Self::PlatformAdapter {
            adapter,
            source: source.into(),
        }
    }
}

/// Invariant violations detected by builders and constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("device id must not be empty")]
    EmptyId,

    #[error("{kind} devices cannot have the {capability} capability")]
    CapabilityNotApplicable {
        kind: DeviceKind,
        capability: Capability,
    },

    #[error("state does not belong to a {0} device")]
    StateKindMismatch(DeviceKind),

    #[error("'{value}' is not a valid {what}")]
    Unrecognized { what: &'static str, value: String },

    #[error("'{command}' requires the '{parameter}' parameter")]
    MissingParameter {
        command: &'static str,
        parameter: &'static str,
    },
}
