//! # hestia-adapter-mqtt
//!
//! Command channel over MQTT.
//!
//! Subscribes to `<base_topic>/command/+`. The last topic segment selects
//! devices by name fragment (`all` selects every capable device) and the
//! payload is either a device command such as
//! `{"command": "set_brightness", "value": 40}` or free text such as
//! `{"text": "movie mode"}`. The result text is published on
//! `<base_topic>/result/<device>`.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `hestia-app` and `hestia-domain`.

pub mod channel;
pub mod command;
pub mod config;
pub mod error;

pub use channel::MqttChannel;
pub use config::MqttConfig;
pub use error::MqttError;
