//! Device commands: platform-independent operations on a single device.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::device::{Capability, DeviceKind, Level};

/// An abstract command. Numeric arguments are carried raw and clamped when
/// the command is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum DeviceCommand {
    TurnOn,
    TurnOff,
    SetBrightness(i64),
    SetColor(Color),
    Play,
    Pause,
    SetVolume(i64),
}

impl DeviceCommand {
    /// Capability a device must have for this command to be valid.
    #[must_use]
    pub const fn required_capability(&self) -> Capability {
        match self {
            Self::TurnOn | Self::TurnOff => Capability::OnOff,
            Self::SetBrightness(_) => Capability::Brightness,
            Self::SetColor(_) => Capability::Color,
            Self::Play => Capability::Play,
            Self::Pause => Capability::Pause,
            Self::SetVolume(_) => Capability::Volume,
        }
    }

    /// Kind of device this command is meant for.
    #[must_use]
    pub const fn target_kind(&self) -> DeviceKind {
        match self {
            Self::TurnOn | Self::TurnOff | Self::SetBrightness(_) | Self::SetColor(_) => {
                DeviceKind::Light
            }
            Self::Play | Self::Pause | Self::SetVolume(_) => DeviceKind::Media,
        }
    }

    /// Past-tense description used in result lines ("brightness set to 20%").
    #[must_use]
    pub fn describe_done(&self) -> String {
        match self {
            Self::TurnOn => "turned on".to_string(),
            Self::TurnOff => "turned off".to_string(),
            Self::SetBrightness(level) => format!("brightness set to {}", Level::clamped(*level)),
            Self::SetColor(color) => format!("color set to {color}"),
            Self::Play => "playback started".to_string(),
            Self::Pause => "playback paused".to_string(),
            Self::SetVolume(level) => format!("volume set to {}", Level::clamped(*level)),
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TurnOn => f.write_str("turn_on"),
            Self::TurnOff => f.write_str("turn_off"),
            Self::SetBrightness(level) => write!(f, "set_brightness({level})"),
            Self::SetColor(color) => write!(f, "set_color({color})"),
            Self::Play => f.write_str("play"),
            Self::Pause => f.write_str("pause"),
            Self::SetVolume(level) => write!(f, "set_volume({level})"),
        }
    }
}

/// How sure an adapter is that a command took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The platform acknowledged the change.
    Confirmed,
    /// The platform call was made but could not confirm its effect.
    Attempted,
}
