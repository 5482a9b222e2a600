//! MQTT adapter error types.

use hestia_domain::error::HestiaError;

/// Errors specific to the MQTT channel.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to parse an incoming payload as a command.
    #[error("failed to parse MQTT payload")]
    PayloadParse(#[source] serde_json::Error),

    /// Failed to encode a reply.
    #[error("failed to encode MQTT reply")]
    Encode(#[source] serde_json::Error),

    /// The topic is not a command topic.
    #[error("'{0}' is not a command topic")]
    Topic(String),
}

impl From<MqttError> for HestiaError {
    fn from(err: MqttError) -> Self {
        Self::adapter("mqtt", err)
    }
}
