//! HTTP lighting-bridge client.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;

use hestia_app::ports::{
    BridgeClient, BridgeDescriptor, BridgeHandle, BridgeLight, BridgeLightState,
};
use hestia_domain::error::HestiaError;

use crate::error::NetworkError;

/// Fields a bridge's `/api/config` document must carry to be accepted.
#[derive(Debug, Deserialize)]
struct BridgeConfig {
    bridgeid: String,
    name: String,
}

/// Identifies bridges over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBridge {
    client: reqwest::Client,
    port: u16,
}

impl HttpBridge {
    /// Client probing `port` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Http`] if the HTTP client cannot be built.
    pub fn new(port: u16, timeout: Duration) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::from_reqwest(client, port))
    }

    #[must_use]
    pub fn from_reqwest(client: reqwest::Client, port: u16) -> Self {
        Self { client, port }
    }

    async fn fetch_config(&self, address: IpAddr) -> Result<Option<BridgeDescriptor>, NetworkError> {
        let url = match address {
            IpAddr::V4(v4) => format!("http://{v4}:{}/api/config", self.port),
            IpAddr::V6(v6) => format!("http://[{v6}]:{}/api/config", self.port),
        };
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::debug!(%address, status = %response.status(), "not a bridge");
            return Ok(None);
        }
        // Anything that does not parse into the required fields is some
        // other web server.
        match response.json::<BridgeConfig>().await {
            Ok(config) => Ok(Some(BridgeDescriptor {
                address,
                bridge_id: config.bridgeid,
                name: config.name,
            })),
            Err(err) => {
                tracing::debug!(%address, error = %err, "unrecognized config document");
                Ok(None)
            }
        }
    }
}

impl BridgeClient for HttpBridge {
    fn identify(
        &self,
        address: IpAddr,
    ) -> impl Future<Output = Result<Option<BridgeDescriptor>, HestiaError>> + Send {
        async move { Ok(self.fetch_config(address).await?) }
    }

    fn pair(
        &self,
        _descriptor: &BridgeDescriptor,
    ) -> impl Future<Output = Result<BridgeHandle, HestiaError>> + Send {
        async { Err(NetworkError::Unsupported("pairing").into()) }
    }

    fn list_lights(
        &self,
        _handle: &BridgeHandle,
    ) -> impl Future<Output = Result<Vec<BridgeLight>, HestiaError>> + Send {
        async { Err(NetworkError::Unsupported("listing lights").into()) }
    }

    fn set_state(
        &self,
        _handle: &BridgeHandle,
        _light_key: &str,
        _state: BridgeLightState,
    ) -> impl Future<Output = Result<(), HestiaError>> + Send {
        async { Err(NetworkError::Unsupported("light control").into()) }
    }
}
