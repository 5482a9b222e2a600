//! Broker connection: subscribes to command topics and answers each message
//! on its own task.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio_util::sync::CancellationToken;

use hestia_app::home::Home;
use hestia_app::ports::{BridgeClient, MediaKeys};

use crate::command::route;
use crate::config::MqttConfig;
use crate::error::MqttError;

/// Pause after a connection error before polling again.
const RETRY_DELAY: Duration = Duration::from_secs(1);
/// Requests that may queue up before the event loop drains them.
const REQUEST_CAPACITY: usize = 10;

/// MQTT front end of a [`Home`].
pub struct MqttChannel {
    config: Arc<MqttConfig>,
}

impl MqttChannel {
    #[must_use]
    pub fn new(config: MqttConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(
            self.config.client_id.clone(),
            self.config.broker_host.clone(),
            self.config.broker_port,
        );
        options.set_keep_alive(self.config.keep_alive());
        options
    }

    /// Serve commands until `shutdown` is cancelled. Connection errors are
    /// logged and retried; the subscription is renewed on every reconnect.
    pub async fn run<B, M>(self, home: Arc<Home<B, M>>, shutdown: CancellationToken)
    where
        B: BridgeClient + 'static,
        M: MediaKeys + 'static,
    {
        let (client, mut event_loop) = AsyncClient::new(self.options(), REQUEST_CAPACITY);
        tracing::info!(
            broker = %self.config.broker_host,
            port = self.config.broker_port,
            "connecting to MQTT broker"
        );

        loop {
            let event = tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                event = event_loop.poll() => event,
            };
            match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    let filter = self.config.command_filter();
                    match client.try_subscribe(filter.as_str(), QoS::AtLeastOnce) {
                        Ok(()) => tracing::info!(%filter, "subscribed to command topics"),
                        Err(err) => {
                            tracing::error!(error = %MqttError::Client(err), %filter, "subscribe failed");
                        }
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let home = Arc::clone(&home);
                    let config = Arc::clone(&self.config);
                    let client = client.clone();
                    tokio::spawn(async move {
                        if let Err(err) =
                            answer(&home, &config, &client, &publish.topic, &publish.payload).await
                        {
                            tracing::warn!(topic = %publish.topic, error = %err, "MQTT command dropped");
                        }
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "MQTT event loop error");
                    tokio::select! {
                        () = shutdown.cancelled() => break,
                        () = tokio::time::sleep(RETRY_DELAY) => {}
                    }
                }
            }
        }

        if let Err(err) = client.try_disconnect() {
            tracing::debug!(error = %err, "MQTT disconnect not sent");
        }
        tracing::info!("MQTT channel stopped");
    }
}

async fn answer<B, M>(
    home: &Home<B, M>,
    config: &MqttConfig,
    client: &AsyncClient,
    topic: &str,
    payload: &[u8],
) -> Result<(), MqttError>
where
    B: BridgeClient,
    M: MediaKeys,
{
    let (result_topic, reply) = route(home, config, topic, payload).await?;
    let body = serde_json::to_vec(&reply).map_err(MqttError::Encode)?;
    client
        .publish(result_topic, QoS::AtLeastOnce, false, body)
        .await
        .map_err(MqttError::Client)
}
