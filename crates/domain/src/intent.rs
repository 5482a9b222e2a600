//! Intent: what a free-text command was classified as.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::DeviceCommand;
use crate::scene::{LightAction, MediaAction};

/// Result of interpreting a command string.
///
/// Light and media intents target every capable device; scene intents
/// carry the scene name verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "value", rename_all = "snake_case")]
pub enum Intent {
    Light(LightAction),
    Media(MediaAction),
    Scene(String),
    Status,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light(action) => write!(f, "light {}", DeviceCommand::from(*action)),
            Self::Media(action) => write!(f, "media {}", DeviceCommand::from(*action)),
            Self::Scene(name) => write!(f, "scene {name}"),
            Self::Status => f.write_str("status"),
        }
    }
}
