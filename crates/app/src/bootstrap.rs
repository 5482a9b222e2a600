//! Virtual bootstrap set, registered when discovery finds nothing.

use hestia_domain::color::Color;
use hestia_domain::device::{
    Capability, Device, DeviceKind, DeviceState, Level, LightState, MediaState, Platform,
    Playback, Power,
};
use hestia_domain::error::HestiaError;
use hestia_domain::id::DeviceId;

use crate::registry::DeviceRegistry;

fn virtual_light(id: &str, name: &str, brightness: i64) -> Result<Device, HestiaError> {
    Device::builder()
        .id(id)
        .kind(DeviceKind::Light)
        .name(name)
        .platform(Platform::Virtual)
        .capabilities([Capability::OnOff, Capability::Brightness, Capability::Color])
        .state(DeviceState::Light(LightState {
            power: Power::Off,
            brightness: Some(Level::clamped(brightness)),
            color: Some(Color::White),
        }))
        .build()
}

/// Two lights and one media player, all virtual.
///
/// # Errors
///
/// Only fails if the fixed definitions break a domain invariant.
pub fn devices() -> Result<Vec<Device>, HestiaError> {
    Ok(vec![
        virtual_light("virtual_living_room_light", "Living Room Light", 100)?,
        virtual_light("virtual_bedroom_light", "Bedroom Light", 80)?,
        Device::builder()
            .id("virtual_music_player")
            .kind(DeviceKind::Media)
            .name("Virtual Music Player")
            .platform(Platform::Virtual)
            .capabilities([Capability::Play, Capability::Pause, Capability::Volume])
            .state(DeviceState::Media(MediaState {
                playback: Playback::Stopped,
                volume: Some(Level::clamped(50)),
            }))
            .build()?,
    ])
}

/// Register the bootstrap set, skipping ids that are already taken.
///
/// # Errors
///
/// Propagates validation failures from [`devices`].
pub fn seed(registry: &DeviceRegistry) -> Result<Vec<DeviceId>, HestiaError> {
    let mut registered = Vec::new();
    for device in devices()? {
        match registry.register(device) {
            Ok(id) => registered.push(id),
            Err(HestiaError::DuplicateId(id)) => {
                tracing::debug!(device_id = %id, "bootstrap device already registered");
            }
            Err(err) => return Err(err),
        }
    }
    tracing::info!(count = registered.len(), "virtual devices registered");
    Ok(registered)
}
