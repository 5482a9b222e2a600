//! Device state: one variant per device kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Capabilities, Capability, DeviceKind};
use crate::color::Color;

/// Power flag of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    On,
    #[default]
    Off,
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// Playback state of a media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Playback {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl fmt::Display for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => f.write_str("playing"),
            Self::Paused => f.write_str("paused"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}

/// A percentage in `0..=100`. Out-of-range input is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Clamp an arbitrary integer into `0..=100`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        // The clamp guarantees the conversion cannot fail.
        Self(u8::try_from(value.clamp(0, 100)).unwrap_or(100))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Level> for u8 {
    fn from(value: Level) -> Self {
        value.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// State of a light. Optional fields are `Some` exactly when the device
/// has the matching capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub power: Power,
    pub brightness: Option<Level>,
    pub color: Option<Color>,
}

/// State of a media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaState {
    pub playback: Playback,
    pub volume: Option<Level>,
}

/// Mutable state of a device, shaped by its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeviceState {
    Light(LightState),
    Media(MediaState),
    /// Unknown devices only report that they exist.
    Presence,
}

impl DeviceState {
    /// Factory default for a device of `kind` with `capabilities`:
    /// lights off at full white, players stopped at half volume.
    #[must_use]
    pub fn initial(kind: DeviceKind, capabilities: &Capabilities) -> Self {
        match kind {
            DeviceKind::Light => Self::Light(LightState {
                power: Power::Off,
                brightness: capabilities
                    .contains(Capability::Brightness)
                    .then_some(Level::MAX),
                color: capabilities
                    .contains(Capability::Color)
                    .then_some(Color::White),
            }),
            DeviceKind::Media => Self::Media(MediaState {
                playback: Playback::Stopped,
                volume: capabilities
                    .contains(Capability::Volume)
                    .then_some(Level::clamped(50)),
            }),
            DeviceKind::Unknown => Self::Presence,
        }
    }

    /// Kind this state belongs to.
    #[must_use]
    pub const fn kind(&self) -> DeviceKind {
        match self {
            Self::Light(_) => DeviceKind::Light,
            Self::Media(_) => DeviceKind::Media,
            Self::Presence => DeviceKind::Unknown,
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light(light) => {
                write!(f, "{}", light.power)?;
                if let Some(level) = light.brightness {
                    write!(f, ", {level}")?;
                }
                if let Some(color) = light.color {
                    write!(f, ", {color}")?;
                }
                Ok(())
            }
            Self::Media(media) => {
                write!(f, "{}", media.playback)?;
                if let Some(volume) = media.volume {
                    write!(f, ", volume {volume}")?;
                }
                Ok(())
            }
            Self::Presence => f.write_str("present"),
        }
    }
}
