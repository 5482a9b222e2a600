//! Action: one typed step of a scene.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::command::DeviceCommand;
use crate::device::{DeviceKind, Level};
use crate::error::{HestiaError, ValidationError};
use crate::selector::Selector;

/// What to do to a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum LightAction {
    On,
    Off,
    Brightness(Level),
    Color(Color),
}

/// What to do to a media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum MediaAction {
    Play,
    Pause,
    Volume(Level),
}

impl From<LightAction> for DeviceCommand {
    fn from(action: LightAction) -> Self {
        match action {
            LightAction::On => Self::TurnOn,
            LightAction::Off => Self::TurnOff,
            LightAction::Brightness(level) => Self::SetBrightness(i64::from(level.value())),
            LightAction::Color(color) => Self::SetColor(color),
        }
    }
}

impl From<MediaAction> for DeviceCommand {
    fn from(action: MediaAction) -> Self {
        match action {
            MediaAction::Play => Self::Play,
            MediaAction::Pause => Self::Pause,
            MediaAction::Volume(level) => Self::SetVolume(i64::from(level.value())),
        }
    }
}

/// One step of a scene: a typed command aimed at a selection of devices.
///
/// Actions are validated when they are built, so an unknown color or a
/// missing parameter is reported when the scene is defined rather than when
/// it is activated. The serde form is the flat [`RawAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub enum Action {
    Light {
        target: Selector,
        command: LightAction,
    },
    Media {
        target: Selector,
        command: MediaAction,
    },
}

impl Action {
    /// Light action aimed at every capable light.
    #[must_use]
    pub fn light(command: LightAction) -> Self {
        Self::Light {
            target: Selector::All,
            command,
        }
    }

    /// Media action aimed at every capable player.
    #[must_use]
    pub fn media(command: MediaAction) -> Self {
        Self::Media {
            target: Selector::All,
            command,
        }
    }

    /// Narrow the action to devices matching `target`.
    #[must_use]
    pub fn with_target(self, target: Selector) -> Self {
        match self {
            Self::Light { command, .. } => Self::Light { target, command },
            Self::Media { command, .. } => Self::Media { target, command },
        }
    }

    #[must_use]
    pub fn target(&self) -> &Selector {
        match self {
            Self::Light { target, .. } | Self::Media { target, .. } => target,
        }
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Light { .. } => DeviceKind::Light,
            Self::Media { .. } => DeviceKind::Media,
        }
    }

    /// The device command this action dispatches.
    #[must_use]
    pub fn command(&self) -> DeviceCommand {
        match self {
            Self::Light { command, .. } => (*command).into(),
            Self::Media { command, .. } => (*command).into(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = RawAction::from(self.clone());
        write!(f, "{} {}", raw.kind, raw.command)?;
        if let Some(level) = raw.level {
            write!(f, " {level}%")?;
        }
        if let Some(color) = raw.color {
            write!(f, " {color}")?;
        }
        if let Some(target) = raw.target {
            write!(f, " ({target})")?;
        }
        Ok(())
    }
}

/// Kind tag of a [`RawAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Light,
    #[serde(alias = "music")]
    Media,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Media => f.write_str("media"),
        }
    }
}

/// Loosely typed action as it arrives from config files or front ends:
/// `{ type = "light", command = "brightness", level = 20 }`.
///
/// Parameters may also be nested, as in
/// `{ type = "music", command = "volume", params = { level = 70 } }`.
/// Top-level values win over nested ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RawParams>,
}

/// Nested parameter block of a [`RawAction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParams {
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl TryFrom<RawAction> for Action {
    type Error = HestiaError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        let target = raw.target.as_deref().map(Selector::parse).unwrap_or_default();
        let command = raw.command.trim().to_ascii_lowercase();
        let params = raw.params.unwrap_or_default();
        let level = raw.level.or(params.level);
        let color = raw.color.or(params.color);

        let action = match raw.kind {
            ActionKind::Light => {
                let command = match command.as_str() {
                    "on" => LightAction::On,
                    "off" => LightAction::Off,
                    "brightness" => LightAction::Brightness(Level::clamped(required(
                        level,
                        "brightness",
                        "level",
                    )?)),
                    "color" => {
                        let name = required(color, "color", "color")?;
                        LightAction::Color(name.parse()?)
                    }
                    _ => return Err(unrecognized_command(raw.command)),
                };
                Self::Light { target, command }
            }
            ActionKind::Media => {
                let command = match command.as_str() {
                    "play" => MediaAction::Play,
                    "pause" => MediaAction::Pause,
                    "volume" => {
                        MediaAction::Volume(Level::clamped(required(level, "volume", "level")?))
                    }
                    _ => return Err(unrecognized_command(raw.command)),
                };
                Self::Media { target, command }
            }
        };
        Ok(action)
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        let target = match action.target() {
            Selector::All => None,
            selector @ Selector::Name(_) => Some(selector.to_string()),
        };
        let (kind, command, level, color) = match action {
            Action::Light { command, .. } => match command {
                LightAction::On => (ActionKind::Light, "on", None, None),
                LightAction::Off => (ActionKind::Light, "off", None, None),
                LightAction::Brightness(level) => (
                    ActionKind::Light,
                    "brightness",
                    Some(i64::from(level.value())),
                    None,
                ),
                LightAction::Color(color) => {
                    (ActionKind::Light, "color", None, Some(color.to_string()))
                }
            },
            Action::Media { command, .. } => match command {
                MediaAction::Play => (ActionKind::Media, "play", None, None),
                MediaAction::Pause => (ActionKind::Media, "pause", None, None),
                MediaAction::Volume(level) => (
                    ActionKind::Media,
                    "volume",
                    Some(i64::from(level.value())),
                    None,
                ),
            },
        };
        Self {
            kind,
            command: command.to_string(),
            target,
            level,
            color,
            params: None,
        }
    }
}

fn required<T>(
    value: Option<T>,
    command: &'static str,
    parameter: &'static str,
) -> Result<T, HestiaError> {
    value.ok_or_else(|| ValidationError::MissingParameter { command, parameter }.into())
}

fn unrecognized_command(value: String) -> HestiaError {
    ValidationError::Unrecognized {
        what: "action command",
        value,
    }
    .into()
}
