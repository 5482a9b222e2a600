//! Home: the facade a front end talks to.
//!
//! Owns the registry, dispatcher and scene engine, and turns interpreted
//! intents into result text.

use std::sync::Arc;

use hestia_domain::command::DeviceCommand;
use hestia_domain::device::{Device, DeviceKind};
use hestia_domain::intent::Intent;
use hestia_domain::selector::Selector;

use crate::discovery::{DiscoveryReport, DiscoveryService};
use crate::dispatcher::Dispatcher;
use crate::interpreter;
use crate::ports::{BridgeClient, MediaKeys, PortProbe};
use crate::registry::{DeviceFilter, DeviceRegistry};
use crate::scene_engine::SceneEngine;

/// The running home core.
pub struct Home<B, M> {
    registry: Arc<DeviceRegistry>,
    dispatcher: Dispatcher<B, M>,
    scenes: SceneEngine,
}

impl<B: BridgeClient, M: MediaKeys> Home<B, M> {
    /// Empty registry, built-in scenes.
    pub fn new(bridge: Arc<B>, media: M) -> Self {
        let registry = Arc::new(DeviceRegistry::new());
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&registry), bridge, media),
            registry,
            scenes: SceneEngine::with_builtin(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<B, M> {
        &self.dispatcher
    }

    #[must_use]
    pub fn scenes(&self) -> &SceneEngine {
        &self.scenes
    }

    /// Run a discovery session into this home's registry and route bridge
    /// lights through the paired bridge, if one was found.
    pub async fn discover<P>(&self, discovery: &DiscoveryService<B, P>) -> DiscoveryReport
    where
        B: 'static,
        P: PortProbe + 'static,
    {
        let report = discovery.discover(&self.registry).await;
        if let Some(handle) = &report.bridge {
            self.dispatcher.attach_bridge(handle.clone());
        }
        report
    }

    /// Interpret `text` and act on it. `None` when the text is not a home
    /// command.
    #[tracing::instrument(skip(self))]
    pub async fn process_command(&self, text: &str) -> Option<String> {
        let intent = interpreter::interpret(text)?;
        Some(self.execute(&intent).await)
    }

    /// Act on an intent and describe the result.
    pub async fn execute(&self, intent: &Intent) -> String {
        match intent {
            Intent::Light(action) => self.control(&DeviceCommand::from(*action)).await,
            Intent::Media(action) => self.control(&DeviceCommand::from(*action)).await,
            Intent::Scene(name) => match self.scenes.activate(name, &self.dispatcher).await {
                Ok(report) => report.to_string(),
                Err(err) => format!("✗ {err}"),
            },
            Intent::Status => self.status(None).await,
        }
    }

    async fn control(&self, command: &DeviceCommand) -> String {
        match self.dispatcher.control(command, &Selector::All).await {
            Ok(report) => report.to_string(),
            Err(err) => format!("✗ {err}"),
        }
    }

    /// Describe one device (by id or name), or every device grouped by kind.
    pub async fn status(&self, device: Option<&str>) -> String {
        match device {
            Some(key) => match self.registry.find(key).await {
                Some(device) => describe(&device),
                None => format!("Device '{key}' not found"),
            },
            None => overview(&self.registry.list(DeviceFilter::All).await),
        }
    }
}

fn describe(device: &Device) -> String {
    format!(
        "{}: {} ({}) - {}",
        device.name, device.kind, device.platform, device.state
    )
}

/// Devices grouped by kind, groups in order of first appearance.
fn overview(devices: &[Device]) -> String {
    if devices.is_empty() {
        return "No devices discovered yet".to_string();
    }

    let mut groups: Vec<(DeviceKind, Vec<&Device>)> = Vec::new();
    for device in devices {
        match groups.iter_mut().find(|(kind, _)| *kind == device.kind) {
            Some((_, members)) => members.push(device),
            None => groups.push((device.kind, vec![device])),
        }
    }

    let mut text = String::from("Smart home status");
    for (kind, members) in groups {
        text.push_str(&format!("\n\n{} ({}):", kind.group_label(), members.len()));
        for device in members {
            text.push_str(&format!("\n  - {} ({})", device.name, device.platform));
        }
    }
    text
}
