//! MQTT channel configuration.

use std::time::Duration;

use serde::Deserialize;

/// `[mqtt]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Connect to the broker at startup.
    pub enabled: bool,
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Prefix of the command and result topics.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "hestia".to_string(),
            base_topic: "skippy".to_string(),
            keep_alive_secs: 60,
        }
    }
}

impl MqttConfig {
    /// Filter matching every command topic.
    #[must_use]
    pub fn command_filter(&self) -> String {
        format!("{}/command/+", self.base_topic)
    }

    #[must_use]
    pub fn result_topic(&self, device: &str) -> String {
        format!("{}/result/{device}", self.base_topic)
    }

    /// The device segment of a command topic, if `topic` is one.
    #[must_use]
    pub fn device_of<'a>(&self, topic: &'a str) -> Option<&'a str> {
        let device = topic
            .strip_prefix(self.base_topic.as_str())?
            .strip_prefix("/command/")?;
        (!device.is_empty() && !device.contains('/')).then_some(device)
    }

    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(u64::from(self.keep_alive_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "hestia");
        assert_eq!(config.command_filter(), "skippy/command/+");
        assert_eq!(config.keep_alive(), Duration::from_secs(60));
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: MqttConfig =
            toml::from_str("enabled = true\nbroker_host = \"192.168.1.100\"").unwrap();
        assert!(config.enabled);
        assert_eq!(config.broker_host, "192.168.1.100");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.base_topic, "skippy");
    }

    #[test]
    fn should_extract_device_from_command_topic() {
        let config = MqttConfig::default();
        assert_eq!(config.device_of("skippy/command/bedroom"), Some("bedroom"));
        assert_eq!(config.device_of("skippy/command/all"), Some("all"));
    }

    #[test]
    fn should_reject_foreign_topics() {
        let config = MqttConfig::default();
        assert_eq!(config.device_of("skippy/result/bedroom"), None);
        assert_eq!(config.device_of("skippy/command/"), None);
        assert_eq!(config.device_of("skippy/command/a/b"), None);
        assert_eq!(config.device_of("skippyx/command/bedroom"), None);
        assert_eq!(config.device_of("homeassistant/light/x/state"), None);
    }

    #[test]
    fn should_build_result_topic_under_base() {
        let config = MqttConfig {
            base_topic: "home".to_string(),
            ..MqttConfig::default()
        };
        assert_eq!(config.result_topic("desk"), "home/result/desk");
    }
}
