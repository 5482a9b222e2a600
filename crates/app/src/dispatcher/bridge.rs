//! Translation of abstract commands into the bridge's native light state.

use hestia_domain::color::Color;
use hestia_domain::command::DeviceCommand;
use hestia_domain::device::Level;
use hestia_domain::error::HestiaError;

use crate::ports::BridgeLightState;

/// Upper bound of the bridge's brightness scale.
pub const BRIDGE_MAX_BRIGHTNESS: u8 = 254;

/// CIE xy coordinates for the colors the bridge understands. Palette colors
/// missing here are rejected per device.
#[must_use]
pub fn xy_for(color: Color) -> Option<[f32; 2]> {
    match color {
        Color::Red => Some([0.7, 0.3]),
        Color::Blue => Some([0.1, 0.1]),
        Color::Green => Some([0.3, 0.6]),
        Color::Yellow => Some([0.5, 0.5]),
        Color::Purple => Some([0.3, 0.1]),
        Color::White => Some([0.3, 0.3]),
        Color::Orange | Color::Pink => None,
    }
}

/// Rescale a percentage to `1..=254`. The bridge treats 0 as invalid, so
/// the lowest percentage still maps to its dimmest setting.
#[must_use]
pub fn scale_brightness(level: Level) -> u8 {
    let scaled = u16::from(level.value()) * u16::from(BRIDGE_MAX_BRIGHTNESS) / 100;
    u8::try_from(scaled)
        .unwrap_or(BRIDGE_MAX_BRIGHTNESS)
        .max(1)
}

/// Bridge state update for a light command.
///
/// # Errors
///
/// Returns [`HestiaError::UnknownColor`] for a color with no xy mapping, and
/// [`HestiaError::PlatformAdapter`] for media commands, which the bridge
/// cannot carry.
pub fn translate(command: &DeviceCommand) -> Result<BridgeLightState, HestiaError> {
    let state = match *command {
        DeviceCommand::TurnOn => BridgeLightState {
            on: Some(true),
            ..BridgeLightState::default()
        },
        DeviceCommand::TurnOff => BridgeLightState {
            on: Some(false),
            ..BridgeLightState::default()
        },
        DeviceCommand::SetBrightness(level) => BridgeLightState {
            bri: Some(scale_brightness(Level::clamped(level))),
            ..BridgeLightState::default()
        },
        DeviceCommand::SetColor(color) => BridgeLightState {
            xy: Some(xy_for(color).ok_or_else(|| HestiaError::UnknownColor(color.to_string()))?),
            ..BridgeLightState::default()
        },
        DeviceCommand::Play | DeviceCommand::Pause | DeviceCommand::SetVolume(_) => {
            return Err(HestiaError::adapter(
                "bridge",
                format!("{command} is not a light command"),
            ));
        }
    };
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_scale_full_brightness_to_bridge_max() {
        assert_eq!(scale_brightness(Level::MAX), 254);
    }

    #[test]
    fn should_truncate_partial_brightness() {
        assert_eq!(scale_brightness(Level::clamped(20)), 50);
        assert_eq!(scale_brightness(Level::clamped(50)), 127);
    }

    #[test]
    fn should_never_send_zero_brightness() {
        assert_eq!(scale_brightness(Level::MIN), 1);
    }

    #[test]
    fn should_translate_color_to_xy() {
        let state = translate(&DeviceCommand::SetColor(Color::Blue)).unwrap();
        assert_eq!(state.xy, Some([0.1, 0.1]));
        assert_eq!(state.on, None);
    }

    #[test]
    fn should_reject_color_missing_from_table() {
        let result = translate(&DeviceCommand::SetColor(Color::Orange));
        assert!(matches!(result, Err(HestiaError::UnknownColor(name)) if name == "orange"));
    }

    #[test]
    fn should_clamp_before_scaling() {
        let state = translate(&DeviceCommand::SetBrightness(400)).unwrap();
        assert_eq!(state.bri, Some(254));
    }
}
