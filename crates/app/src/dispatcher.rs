//! Device control dispatcher: routes typed commands to the platform that
//! owns each device and itemizes the per-device outcome.

pub mod bridge;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use hestia_domain::command::{DeviceCommand, Outcome};
use hestia_domain::device::{Device, DeviceKind, Level, Platform};
use hestia_domain::error::HestiaError;
use hestia_domain::id::DeviceId;
use hestia_domain::selector::Selector;

use crate::ports::{BridgeClient, BridgeHandle, MediaKeys};
use crate::registry::{DeviceFilter, DeviceRegistry};

/// Result of a command for one targeted device.
#[derive(Debug)]
pub struct DeviceOutcome {
    pub device_id: DeviceId,
    pub device_name: String,
    pub platform: Platform,
    pub result: Result<Outcome, HestiaError>,
}

/// Overall verdict of a control call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStatus {
    /// Every device confirmed the change.
    Confirmed,
    /// No failures, but at least one change was best effort.
    Attempted,
    /// Some devices failed.
    Partial,
    /// Every device failed.
    Failed,
}

/// Per-device results of one control call, in device registration order.
#[derive(Debug)]
pub struct ControlReport {
    pub command: DeviceCommand,
    pub entries: Vec<DeviceOutcome>,
}

impl ControlReport {
    #[must_use]
    pub fn status(&self) -> ControlStatus {
        let failures = self.entries.iter().filter(|e| e.result.is_err()).count();
        if failures > 0 && failures == self.entries.len() {
            ControlStatus::Failed
        } else if failures > 0 {
            ControlStatus::Partial
        } else if self
            .entries
            .iter()
            .any(|e| matches!(e.result, Ok(Outcome::Attempted)))
        {
            ControlStatus::Attempted
        } else {
            ControlStatus::Confirmed
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeviceOutcome> {
        self.entries.iter().filter(|e| e.result.is_err())
    }
}

impl fmt::Display for ControlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let done = self.command.describe_done();
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            match &entry.result {
                Ok(Outcome::Confirmed) => write!(f, "✓ {}: {done}", entry.device_name)?,
                Ok(Outcome::Attempted) => {
                    write!(f, "~ {}: {done} (best effort)", entry.device_name)?;
                }
                Err(err) => write!(f, "✗ {}: {err}", entry.device_name)?,
            }
        }
        Ok(())
    }
}

/// Routes commands to the bridge adapter, the media-key adapter, or the
/// in-memory state of virtual devices.
///
/// Control runs inline on the caller's task. Devices are handled one after
/// the other, and a failure on one device never stops the others.
pub struct Dispatcher<B, M> {
    registry: Arc<DeviceRegistry>,
    bridge: Arc<B>,
    handle: RwLock<Option<BridgeHandle>>,
    media: M,
}

impl<B: BridgeClient, M: MediaKeys> Dispatcher<B, M> {
    pub fn new(registry: Arc<DeviceRegistry>, bridge: Arc<B>, media: M) -> Self {
        Self {
            registry,
            bridge,
            handle: RwLock::new(None),
            media,
        }
    }

    /// Route bridge-backed devices through this paired bridge from now on.
    pub fn attach_bridge(&self, handle: BridgeHandle) {
        tracing::info!(bridge_id = %handle.descriptor.bridge_id, "bridge attached");
        *self.handle.write().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    #[must_use]
    pub fn bridge_handle(&self) -> Option<BridgeHandle> {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn media(&self) -> &M {
        &self.media
    }

    /// Apply `command` to every device `selector` picks.
    ///
    /// [`Selector::All`] picks every device with the capability the command
    /// requires. A name selector picks devices of the command's kind whose
    /// name contains the fragment; capability failures among those are
    /// reported per device.
    ///
    /// # Errors
    ///
    /// Returns [`HestiaError::NoMatchingDevice`] when nothing is selected.
    /// Per-device failures are itemized in the report instead.
    #[tracing::instrument(skip(self), fields(command = %command, selector = %selector))]
    pub async fn control(
        &self,
        command: &DeviceCommand,
        selector: &Selector,
    ) -> Result<ControlReport, HestiaError> {
        let targets = self.select(command, selector).await;
        if targets.is_empty() {
            return Err(HestiaError::NoMatchingDevice {
                kind: command.target_kind(),
                selector: selector.clone(),
            });
        }

        let mut entries = Vec::with_capacity(targets.len());
        for target in targets {
            let result = self.apply_to(&target.id, command).await;
            if let Err(err) = &result {
                tracing::warn!(device_id = %target.id, error = %err, "device command failed");
            }
            entries.push(DeviceOutcome {
                device_id: target.id,
                device_name: target.name,
                platform: target.platform,
                result,
            });
        }

        let report = ControlReport {
            command: *command,
            entries,
        };
        tracing::debug!(status = ?report.status(), devices = report.entries.len(), "control finished");
        Ok(report)
    }

    async fn select(&self, command: &DeviceCommand, selector: &Selector) -> Vec<Device> {
        let capability = command.required_capability();
        let kind = command.target_kind();
        self.registry
            .list(DeviceFilter::All)
            .await
            .into_iter()
            .filter(|device| match selector {
                Selector::All => device.supports(capability),
                Selector::Name(_) => device.kind == kind && selector.matches_name(&device.name),
            })
            .collect()
    }

    /// Validate against a copy, call the platform, then commit. The device
    /// lock is held throughout, so the record only changes once the platform
    /// accepted the command.
    async fn apply_to(&self, id: &DeviceId, command: &DeviceCommand) -> Result<Outcome, HestiaError> {
        let mut record = self.registry.lock(id).await?;
        let mut next = Device::clone(&record);
        next.apply(command)?;

        let outcome = match record.platform {
            Platform::BridgeBacked => self.send_to_bridge(&record, command).await?,
            Platform::Virtual if record.kind == DeviceKind::Media => {
                self.send_to_media_keys(&record, &next, command).await?
            }
            Platform::Virtual | Platform::Network | Platform::Unrecognized => Outcome::Confirmed,
        };

        *record = next;
        Ok(outcome)
    }

    async fn send_to_bridge(
        &self,
        device: &Device,
        command: &DeviceCommand,
    ) -> Result<Outcome, HestiaError> {
        let handle = self
            .bridge_handle()
            .ok_or_else(|| HestiaError::adapter("bridge", "no bridge is paired"))?;
        let key = device
            .address
            .as_deref()
            .ok_or_else(|| HestiaError::adapter("bridge", format!("{} has no bridge key", device.id)))?;
        let state = bridge::translate(command)?;
        self.bridge.set_state(&handle, key, state).await?;
        Ok(Outcome::Confirmed)
    }

    /// Play and pause share a single toggle key, so the key is only pressed
    /// when the playback state actually changes.
    async fn send_to_media_keys(
        &self,
        current: &Device,
        next: &Device,
        command: &DeviceCommand,
    ) -> Result<Outcome, HestiaError> {
        match *command {
            DeviceCommand::Play | DeviceCommand::Pause if current.state == next.state => {
                Ok(Outcome::Confirmed)
            }
            DeviceCommand::Play | DeviceCommand::Pause => self.media.toggle_play_pause().await,
            DeviceCommand::SetVolume(level) => {
                self.media.set_volume(Level::clamped(level).value()).await
            }
            _ => Ok(Outcome::Confirmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap;
    use crate::testing::{FakeBridge, FakeMediaKeys};
    use hestia_domain::color::Color;
    use hestia_domain::device::{Capabilities, Capability, DeviceState, LightState, MediaState, Playback, Power};

    fn dispatcher() -> Dispatcher<FakeBridge, FakeMediaKeys> {
        let registry = Arc::new(DeviceRegistry::new());
        bootstrap::seed(&registry).unwrap();
        Dispatcher::new(registry, Arc::new(FakeBridge::default()), FakeMediaKeys::default())
    }

    fn bridge_light(key: &str, name: &str) -> Device {
        Device::builder()
            .id(DeviceId::slugged("bridge", name))
            .kind(DeviceKind::Light)
            .name(name)
            .platform(Platform::BridgeBacked)
            .address(key)
            .capabilities([Capability::OnOff, Capability::Brightness, Capability::Color])
            .build()
            .unwrap()
    }

    async fn power_of(dispatcher: &Dispatcher<FakeBridge, FakeMediaKeys>, id: &str) -> Power {
        match dispatcher
            .registry()
            .query(&DeviceId::from(id))
            .await
            .unwrap()
            .state
        {
            DeviceState::Light(LightState { power, .. }) => power,
            other => panic!("not a light: {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_turn_on_every_light_when_selector_is_all() {
        let dispatcher = dispatcher();

        let report = dispatcher
            .control(&DeviceCommand::TurnOn, &Selector::All)
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.status(), ControlStatus::Confirmed);
        assert_eq!(power_of(&dispatcher, "virtual_living_room_light").await, Power::On);
        assert_eq!(power_of(&dispatcher, "virtual_bedroom_light").await, Power::On);
    }

    #[tokio::test]
    async fn should_fail_call_when_no_device_has_capability() {
        let registry = Arc::new(DeviceRegistry::new());
        let dispatcher = Dispatcher::new(
            registry,
            Arc::new(FakeBridge::default()),
            FakeMediaKeys::default(),
        );

        let result = dispatcher.control(&DeviceCommand::TurnOn, &Selector::All).await;

        assert!(matches!(
            result,
            Err(HestiaError::NoMatchingDevice {
                kind: DeviceKind::Light,
                selector: Selector::All,
            })
        ));
    }

    #[tokio::test]
    async fn should_fail_call_when_only_devices_without_on_off_are_registered() {
        let registry = Arc::new(DeviceRegistry::new());
        registry
            .register(
                Device::builder()
                    .id("network_device_192_168_1_4")
                    .kind(DeviceKind::Unknown)
                    .name("Device at 192.168.1.4")
                    .platform(Platform::Network)
                    .address("192.168.1.4:80")
                    .capabilities(Capabilities::none())
                    .build()
                    .unwrap(),
            )
            .unwrap();
        for device in bootstrap::devices().unwrap() {
            if device.kind == DeviceKind::Media {
                registry.register(device).unwrap();
            }
        }
        let dispatcher = Dispatcher::new(
            registry,
            Arc::new(FakeBridge::default()),
            FakeMediaKeys::default(),
        );

        for selector in [Selector::All, Selector::parse("device")] {
            let result = dispatcher.control(&DeviceCommand::TurnOn, &selector).await;

            assert!(matches!(
                result,
                Err(HestiaError::NoMatchingDevice {
                    kind: DeviceKind::Light,
                    ..
                })
            ));
        }
        assert!(dispatcher.bridge.calls().is_empty());
    }

    #[tokio::test]
    async fn should_match_name_fragment_case_insensitively() {
        let dispatcher = dispatcher();

        let report = dispatcher
            .control(&DeviceCommand::TurnOn, &Selector::parse("BEDROOM"))
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].device_name, "Bedroom Light");
        assert_eq!(power_of(&dispatcher, "virtual_living_room_light").await, Power::Off);
    }

    #[tokio::test]
    async fn should_be_idempotent_when_turning_off_twice() {
        let dispatcher = dispatcher();

        dispatcher
            .control(&DeviceCommand::TurnOff, &Selector::All)
            .await
            .unwrap();
        let after_once = dispatcher.registry().list(DeviceFilter::All).await;
        dispatcher
            .control(&DeviceCommand::TurnOff, &Selector::All)
            .await
            .unwrap();
        let after_twice = dispatcher.registry().list(DeviceFilter::All).await;

        assert_eq!(after_once, after_twice);
    }

    #[tokio::test]
    async fn should_send_scaled_state_to_bridge() {
        let dispatcher = dispatcher();
        dispatcher
            .registry()
            .register(bridge_light("3", "Hall Ceiling"))
            .unwrap();
        dispatcher.attach_bridge(FakeBridge::handle());

        let report = dispatcher
            .control(&DeviceCommand::SetBrightness(20), &Selector::parse("hall"))
            .await
            .unwrap();

        assert_eq!(report.status(), ControlStatus::Confirmed);
        let calls = dispatcher.bridge.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "3");
        assert_eq!(calls[0].1.bri, Some(50));
    }

    #[tokio::test]
    async fn should_isolate_unknown_color_to_bridge_device() {
        let dispatcher = dispatcher();
        dispatcher
            .registry()
            .register(bridge_light("3", "Hall Ceiling"))
            .unwrap();
        dispatcher.attach_bridge(FakeBridge::handle());

        let report = dispatcher
            .control(&DeviceCommand::SetColor(Color::Orange), &Selector::All)
            .await
            .unwrap();

        assert_eq!(report.status(), ControlStatus::Partial);
        let failed: Vec<_> = report.failures().map(|e| e.device_name.as_str()).collect();
        assert_eq!(failed, ["Hall Ceiling"]);
        assert!(report.to_string().contains("✗ Hall Ceiling: unknown color: orange"));
        assert!(report.to_string().contains("✓ Bedroom Light: color set to orange"));
    }

    #[tokio::test]
    async fn should_keep_bridge_device_state_when_adapter_fails() {
        let dispatcher = dispatcher();
        let id = dispatcher
            .registry()
            .register(bridge_light("3", "Hall Ceiling"))
            .unwrap();

        let report = dispatcher
            .control(&DeviceCommand::TurnOn, &Selector::parse("hall"))
            .await
            .unwrap();

        assert_eq!(report.status(), ControlStatus::Failed);
        assert!(matches!(
            report.entries[0].result,
            Err(HestiaError::PlatformAdapter { adapter: "bridge", .. })
        ));
        assert_eq!(power_of(&dispatcher, id.as_str()).await, Power::Off);
    }

    #[tokio::test]
    async fn should_report_capability_failure_for_named_device() {
        let dispatcher = dispatcher();
        dispatcher
            .registry()
            .register(
                Device::builder()
                    .id("porch")
                    .kind(DeviceKind::Light)
                    .name("Porch Light")
                    .platform(Platform::Virtual)
                    .capabilities([Capability::OnOff])
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let report = dispatcher
            .control(&DeviceCommand::SetColor(Color::Red), &Selector::parse("porch"))
            .await
            .unwrap();

        assert_eq!(report.status(), ControlStatus::Failed);
        assert!(matches!(
            report.entries[0].result,
            Err(HestiaError::CapabilityUnsupported {
                capability: Capability::Color,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn should_mirror_volume_to_media_keys() {
        let dispatcher = dispatcher();

        let report = dispatcher
            .control(&DeviceCommand::SetVolume(130), &Selector::All)
            .await
            .unwrap();

        assert_eq!(report.status(), ControlStatus::Confirmed);
        assert_eq!(dispatcher.media.volumes(), [100]);
    }

    #[tokio::test]
    async fn should_distinguish_best_effort_media_outcome() {
        let registry = Arc::new(DeviceRegistry::new());
        bootstrap::seed(&registry).unwrap();
        let dispatcher = Dispatcher::new(
            registry,
            Arc::new(FakeBridge::default()),
            FakeMediaKeys::attempting(),
        );

        let report = dispatcher
            .control(&DeviceCommand::Play, &Selector::All)
            .await
            .unwrap();

        assert_eq!(report.status(), ControlStatus::Attempted);
        assert_eq!(
            report.to_string(),
            "~ Virtual Music Player: playback started (best effort)"
        );
    }

    #[tokio::test]
    async fn should_only_press_toggle_when_playback_changes() {
        let dispatcher = dispatcher();

        dispatcher
            .control(&DeviceCommand::Play, &Selector::All)
            .await
            .unwrap();
        dispatcher
            .control(&DeviceCommand::Play, &Selector::All)
            .await
            .unwrap();
        dispatcher
            .control(&DeviceCommand::Pause, &Selector::All)
            .await
            .unwrap();

        assert_eq!(dispatcher.media.toggles(), 2);
        let player = dispatcher
            .registry()
            .query(&DeviceId::from("virtual_music_player"))
            .await
            .unwrap();
        assert!(matches!(
            player.state,
            DeviceState::Media(MediaState {
                playback: Playback::Paused,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn should_keep_media_state_when_media_keys_fail() {
        let registry = Arc::new(DeviceRegistry::new());
        bootstrap::seed(&registry).unwrap();
        let dispatcher = Dispatcher::new(
            registry,
            Arc::new(FakeBridge::default()),
            FakeMediaKeys::failing(),
        );

        let report = dispatcher
            .control(&DeviceCommand::Play, &Selector::All)
            .await
            .unwrap();

        assert_eq!(report.status(), ControlStatus::Failed);
        let player = dispatcher
            .registry()
            .query(&DeviceId::from("virtual_music_player"))
            .await
            .unwrap();
        assert!(matches!(
            player.state,
            DeviceState::Media(MediaState {
                playback: Playback::Stopped,
                ..
            })
        ));
    }
}
