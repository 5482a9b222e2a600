//! Command messages: payload parsing and routing through [`Home`].

use serde::{Deserialize, Serialize};

use hestia_app::home::Home;
use hestia_app::ports::{BridgeClient, MediaKeys};
use hestia_domain::command::DeviceCommand;
use hestia_domain::selector::Selector;

use crate::config::MqttConfig;
use crate::error::MqttError;

/// Body of a command message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandPayload {
    /// Free text, interpreted like a spoken command. The topic's device
    /// segment is ignored.
    Text { text: String },
    /// A command for the devices the topic selects.
    Device(DeviceCommand),
}

impl CommandPayload {
    /// # Errors
    ///
    /// Returns [`MqttError::PayloadParse`] when the bytes are neither form.
    pub fn parse(payload: &[u8]) -> Result<Self, MqttError> {
        serde_json::from_slice(payload).map_err(MqttError::PayloadParse)
    }
}

/// Published on the result topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReply {
    pub handled: bool,
    pub result: Option<String>,
}

/// Handle one message received on `topic`. Returns the topic to publish the
/// reply on, and the reply.
///
/// # Errors
///
/// Fails when `topic` is not a command topic or the payload does not parse.
/// Device failures are reported inside the reply.
#[tracing::instrument(skip(home, config, payload))]
pub async fn route<B, M>(
    home: &Home<B, M>,
    config: &MqttConfig,
    topic: &str,
    payload: &[u8],
) -> Result<(String, CommandReply), MqttError>
where
    B: BridgeClient,
    M: MediaKeys,
{
    let device = config
        .device_of(topic)
        .ok_or_else(|| MqttError::Topic(topic.to_string()))?;

    let reply = match CommandPayload::parse(payload)? {
        CommandPayload::Text { text } => {
            let result = home.process_command(&text).await;
            CommandReply {
                handled: result.is_some(),
                result,
            }
        }
        CommandPayload::Device(command) => {
            let result = match home
                .dispatcher()
                .control(&command, &Selector::parse(device))
                .await
            {
                Ok(report) => report.to_string(),
                Err(err) => format!("✗ {err}"),
            };
            CommandReply {
                handled: true,
                result: Some(result),
            }
        }
    };

    Ok((config.result_topic(device), reply))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hestia_adapter_virtual::{VirtualBridge, VirtualMediaKeys};
    use hestia_app::bootstrap;
    use hestia_domain::color::Color;

    use super::*;

    fn home() -> Home<VirtualBridge, VirtualMediaKeys> {
        let home = Home::new(Arc::new(VirtualBridge::new()), VirtualMediaKeys::default());
        bootstrap::seed(home.registry()).unwrap();
        home
    }

    #[test]
    fn should_parse_device_command_payload() {
        let payload = CommandPayload::parse(br#"{"command":"set_color","value":"blue"}"#).unwrap();
        assert_eq!(payload, CommandPayload::Device(DeviceCommand::SetColor(Color::Blue)));
    }

    #[test]
    fn should_parse_text_payload() {
        let payload = CommandPayload::parse(br#"{"text":"lights off"}"#).unwrap();
        assert_eq!(
            payload,
            CommandPayload::Text {
                text: "lights off".to_string()
            }
        );
    }

    #[test]
    fn should_reject_unknown_payload() {
        let result = CommandPayload::parse(br#"{"command":"explode"}"#);
        assert!(matches!(result, Err(MqttError::PayloadParse(_))));
    }

    #[tokio::test]
    async fn should_control_devices_selected_by_topic() {
        let home = home();

        let (topic, reply) = route(
            &home,
            &MqttConfig::default(),
            "skippy/command/bedroom",
            br#"{"command":"turn_on"}"#,
        )
        .await
        .unwrap();

        assert_eq!(topic, "skippy/result/bedroom");
        assert_eq!(
            reply,
            CommandReply {
                handled: true,
                result: Some("✓ Bedroom Light: turned on".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn should_report_unmatched_device_in_reply() {
        let home = home();

        let (_, reply) = route(
            &home,
            &MqttConfig::default(),
            "skippy/command/garage",
            br#"{"command":"turn_off"}"#,
        )
        .await
        .unwrap();

        assert_eq!(
            reply.result.as_deref(),
            Some("✗ no light device matches 'garage'")
        );
    }

    #[tokio::test]
    async fn should_interpret_text_payload() {
        let home = home();

        let (_, reply) = route(
            &home,
            &MqttConfig::default(),
            "skippy/command/all",
            br#"{"text":"what's the weather"}"#,
        )
        .await
        .unwrap();

        assert_eq!(
            reply,
            CommandReply {
                handled: false,
                result: None,
            }
        );
    }

    #[tokio::test]
    async fn should_reject_message_outside_command_topics() {
        let home = home();

        let result = route(
            &home,
            &MqttConfig::default(),
            "homeassistant/light/desk/state",
            br#"{"command":"turn_on"}"#,
        )
        .await;

        assert!(matches!(result, Err(MqttError::Topic(_))));
    }
}
