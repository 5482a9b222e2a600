//! Bridge port: the third-party lighting bridge as an opaque service.

use std::future::Future;
use std::net::IpAddr;

use hestia_domain::error::HestiaError;

/// What a bridge said about itself when identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeDescriptor {
    pub address: IpAddr,
    pub bridge_id: String,
    pub name: String,
}

/// A paired bridge: its descriptor plus the credential granted by pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeHandle {
    pub descriptor: BridgeDescriptor,
    pub token: String,
}

/// A light owned by the bridge, addressed by the bridge's own key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeLight {
    pub key: String,
    pub name: String,
}

/// Partial state update in the bridge's native units.
///
/// `bri` is `0..=254`; `xy` is a CIE chromaticity pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BridgeLightState {
    pub on: Option<bool>,
    pub bri: Option<u8>,
    pub xy: Option<[f32; 2]>,
}

/// Client for a lighting bridge on the local network.
pub trait BridgeClient: Send + Sync {
    /// Probe `address` and return its descriptor when a bridge answers with
    /// the expected identification fields. `Ok(None)` means "not a bridge".
    fn identify(
        &self,
        address: IpAddr,
    ) -> impl Future<Output = Result<Option<BridgeDescriptor>, HestiaError>> + Send;

    /// One-time pairing handshake.
    fn pair(
        &self,
        descriptor: &BridgeDescriptor,
    ) -> impl Future<Output = Result<BridgeHandle, HestiaError>> + Send;

    /// Lights the paired bridge exposes.
    fn list_lights(
        &self,
        handle: &BridgeHandle,
    ) -> impl Future<Output = Result<Vec<BridgeLight>, HestiaError>> + Send;

    /// Push a partial state update to one light.
    fn set_state(
        &self,
        handle: &BridgeHandle,
        light_key: &str,
        state: BridgeLightState,
    ) -> impl Future<Output = Result<(), HestiaError>> + Send;
}
