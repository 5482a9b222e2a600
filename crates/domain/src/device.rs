//! Device: a controllable (or merely present) thing known to the registry.

mod capability;
mod state;

pub use capability::{Capabilities, Capability};
pub use state::{DeviceState, LightState, Level, MediaState, Playback, Power};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::DeviceCommand;
use crate::error::{HestiaError, ValidationError};
use crate::id::DeviceId;

/// What sort of thing a device is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Media,
    Unknown,
}

impl DeviceKind {
    /// Heading used when devices are grouped by kind.
    #[must_use]
    pub const fn group_label(self) -> &'static str {
        match self {
            Self::Light => "Lights",
            Self::Media => "Media players",
            Self::Unknown => "Other devices",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Media => f.write_str("media"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Which adapter the dispatcher routes a device's commands through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Owned by a paired third-party bridge.
    BridgeBacked,
    /// In-memory stand-in.
    Virtual,
    /// A host that answered a generic port probe.
    Network,
    Unrecognized,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BridgeBacked => f.write_str("bridge"),
            Self::Virtual => f.write_str("virtual"),
            Self::Network => f.write_str("network"),
            Self::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

/// A registered device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
    pub name: String,
    pub platform: Platform,
    pub capabilities: Capabilities,
    /// Platform-native address: the bridge's light key, or `ip:port` for
    /// network devices.
    pub address: Option<String>,
    pub state: DeviceState,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::Validation`] when:
    /// - `id` is empty ([`ValidationError::EmptyId`])
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - a capability does not apply to `kind`
    ///   ([`ValidationError::CapabilityNotApplicable`])
    /// - `state` belongs to another kind ([`ValidationError::StateKindMismatch`])
    pub fn validate(&self) -> Result<(), HestiaError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if let Some(capability) = self
            .capabilities
            .iter()
            .find(|capability| !capability.applies_to(self.kind))
        {
            return Err(ValidationError::CapabilityNotApplicable {
                kind: self.kind,
                capability,
            }
            .into());
        }
        if self.state.kind() != self.kind {
            return Err(ValidationError::StateKindMismatch(self.kind).into());
        }
        Ok(())
    }

    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Apply `command` to the device state.
    ///
    /// Brightness and volume are clamped into `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::CapabilityUnsupported`] when the device lacks
    /// the capability `command` requires. The state is left untouched.
    pub fn apply(&mut self, command: &DeviceCommand) -> Result<(), HestiaError> {
        let capability = command.required_capability();
        if !self.supports(capability) {
            return Err(self.unsupported(capability));
        }

        let applied = match (&mut self.state, *command) {
            (DeviceState::Light(light), DeviceCommand::TurnOn) => {
                light.power = Power::On;
                true
            }
            (DeviceState::Light(light), DeviceCommand::TurnOff) => {
                light.power = Power::Off;
                true
            }
            (DeviceState::Light(light), DeviceCommand::SetBrightness(level)) => {
                light.brightness = Some(Level::clamped(level));
                true
            }
            (DeviceState::Light(light), DeviceCommand::SetColor(color)) => {
                light.color = Some(color);
                true
            }
            (DeviceState::Media(media), DeviceCommand::Play) => {
                media.playback = Playback::Playing;
                true
            }
            (DeviceState::Media(media), DeviceCommand::Pause) => {
                media.playback = Playback::Paused;
                true
            }
            (DeviceState::Media(media), DeviceCommand::SetVolume(level)) => {
                media.volume = Some(Level::clamped(level));
                true
            }
            _ => false,
        };
        if !applied {
            return Err(self.unsupported(capability));
        }
        Ok(())
    }

    fn unsupported(&self, capability: Capability) -> HestiaError {
        HestiaError::CapabilityUnsupported {
            device: self.name.clone(),
            capability,
        }
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    kind: Option<DeviceKind>,
    name: Option<String>,
    platform: Option<Platform>,
    capabilities: Option<Capabilities>,
    address: Option<String>,
    state: Option<DeviceState>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    #[must_use]
    pub fn capabilities(mut self, capabilities: impl Into<Capabilities>) -> Self {
        self.capabilities = Some(capabilities.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Override the initial state. Defaults to [`DeviceState::initial`].
    #[must_use]
    pub fn state(mut self, state: DeviceState) -> Self {
        self.state = Some(state);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// `kind` defaults to [`DeviceKind::Unknown`] and `platform` to
    /// [`Platform::Unrecognized`].
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::Validation`] if the result breaks an invariant
    /// (see [`Device::validate`]).
    pub fn build(self) -> Result<Device, HestiaError> {
        let kind = self.kind.unwrap_or(DeviceKind::Unknown);
        let capabilities = self.capabilities.unwrap_or_default();
        let state = self
            .state
            .unwrap_or_else(|| DeviceState::initial(kind, &capabilities));
        let device = Device {
            id: self.id.unwrap_or_else(|| DeviceId::new("")),
            kind,
            name: self.name.unwrap_or_default(),
            platform: self.platform.unwrap_or(Platform::Unrecognized),
            capabilities,
            address: self.address,
            state,
        };
        device.validate()?;
        Ok(device)
    }
}
