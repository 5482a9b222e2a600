//! Capabilities: statically known device abilities that gate commands.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DeviceKind;

/// A single device ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    OnOff,
    Brightness,
    Color,
    Play,
    Pause,
    Volume,
}

impl Capability {
    /// Whether a device of `kind` may carry this capability.
    #[must_use]
    pub const fn applies_to(self, kind: DeviceKind) -> bool {
        match self {
            Self::OnOff | Self::Brightness | Self::Color => matches!(kind, DeviceKind::Light),
            Self::Play | Self::Pause | Self::Volume => matches!(kind, DeviceKind::Media),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OnOff => "on/off",
            Self::Brightness => "brightness",
            Self::Color => "color",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Volume => "volume",
        })
    }
}

/// The capability set of a device. Fixed once the device is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    /// Presence only: no controllable ability.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Capability; N]> for Capabilities {
    fn from(value: [Capability; N]) -> Self {
        value.into_iter().collect()
    }
}
