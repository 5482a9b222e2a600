//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `hestia.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::Deserialize;

use hestia_adapter_mqtt::MqttConfig;
use hestia_app::discovery::DiscoveryConfig;
use hestia_domain::scene::Action;

use crate::media::BackendKind;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Discovery session settings.
    pub discovery: DiscoverySettings,
    /// Media keys backend.
    pub media: MediaConfig,
    /// MQTT command channel.
    pub mqtt: MqttConfig,
    /// User-defined scenes, created after the built-in ones.
    pub scenes: Vec<SceneConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Discovery configuration. Host ranges are last octets within the /24.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Run discovery at startup; when off, the virtual devices are seeded.
    pub enabled: bool,
    /// First three octets, e.g. `192.168.1`. Derived from the local address
    /// when unset.
    pub network_base: Option<String>,
    /// This host's LAN address. Detected when unset.
    pub local_address: Option<Ipv4Addr>,
    pub bridge_first: u8,
    pub bridge_last: u8,
    /// Port the bridge serves its `/api/config` document on.
    pub bridge_port: u16,
    pub probe_first: u8,
    pub probe_last: u8,
    pub ports: Vec<u16>,
    pub timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub concurrency: usize,
}

/// `[media]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub backend: BackendKind,
}

/// One `[[scenes]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Config {
    /// Load configuration from `hestia.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hestia.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides looked up through `var`. `RUST_LOG` wins over
    /// `HESTIA_LOG`, `HESTIA_BIND` over `HESTIA_HOST`/`HESTIA_PORT`.
    /// `HESTIA_MQTT_HOST` also turns the MQTT channel on.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HESTIA_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("HESTIA_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("HESTIA_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("HESTIA_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("HESTIA_NETWORK_BASE") {
            self.discovery.network_base = Some(val);
        }
        if let Some(val) = var("HESTIA_MQTT_HOST") {
            self.mqtt.broker_host = val;
            self.mqtt.enabled = true;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        self.discovery.validate()?;
        if self.mqtt.enabled && self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "mqtt broker_port must be non-zero".to_string(),
            ));
        }
        if self.mqtt.base_topic.is_empty() || self.mqtt.base_topic.contains(['+', '#']) {
            return Err(ConfigError::Validation(format!(
                "mqtt base_topic '{}' must be non-empty and free of wildcards",
                self.mqtt.base_topic
            )));
        }
        if let Some(scene) = self.scenes.iter().find(|scene| scene.name.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "scene with {} actions has a blank name",
                scene.actions.len()
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DiscoverySettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.network_base {
            if parse_network_base(base).is_none() {
                return Err(ConfigError::Validation(format!(
                    "network_base '{base}' is not three octets like 192.168.1"
                )));
            }
        }
        if self.bridge_first > self.bridge_last || self.probe_first > self.probe_last {
            return Err(ConfigError::Validation(
                "discovery host ranges must not be reversed".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Validation(
                "discovery concurrency must be non-zero".to_string(),
            ));
        }
        if self.timeout_ms == 0 || self.probe_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "discovery timeouts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Session tunables. `detected` is the local address found at runtime,
    /// used when none is configured.
    #[must_use]
    pub fn session(&self, detected: Option<Ipv4Addr>) -> DiscoveryConfig {
        let local_address = self.local_address.or(detected);
        let network_base = self
            .network_base
            .as_deref()
            .and_then(parse_network_base)
            .or_else(|| local_address.map(hestia_adapter_network::local::network_base))
            .unwrap_or(DiscoveryConfig::default().network_base);
        DiscoveryConfig {
            network_base,
            local_address,
            bridge_hosts: RangeInclusive::new(self.bridge_first, self.bridge_last),
            probe_hosts: RangeInclusive::new(self.probe_first, self.probe_last),
            ports: self.ports.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            probe_timeout: self.probe_timeout(),
            concurrency: self.concurrency,
        }
    }
}

fn parse_network_base(raw: &str) -> Option<[u8; 3]> {
    let mut octets = raw.trim().trim_end_matches('.').split('.').map(str::parse::<u8>);
    let base = [octets.next()?.ok()?, octets.next()?.ok()?, octets.next()?.ok()?];
    octets.next().is_none().then_some(base)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hestiad=info,hestia_app=info,hestia_adapter_mqtt=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            network_base: None,
            local_address: None,
            bridge_first: 1,
            bridge_last: 20,
            bridge_port: 80,
            probe_first: 1,
            probe_last: 4,
            ports: vec![80, 8080],
            timeout_ms: 5_000,
            probe_timeout_ms: 2_000,
            concurrency: 8,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
