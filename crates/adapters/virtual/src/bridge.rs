//! Virtual lighting bridge.

use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hestia_app::ports::{
    BridgeClient, BridgeDescriptor, BridgeHandle, BridgeLight, BridgeLightState,
};
use hestia_domain::error::HestiaError;

use crate::error::VirtualError;

const ADAPTER: &str = "bridge";

/// A bridge that lives in memory.
///
/// Answers identification at the configured addresses, hands out a fixed
/// token on pairing (unless told to reject it) and keeps the last state
/// pushed to each light.
#[derive(Default)]
pub struct VirtualBridge {
    bridges: HashMap<IpAddr, BridgeDescriptor>,
    lights: Vec<BridgeLight>,
    reject_pairing: bool,
    states: Mutex<HashMap<String, BridgeLightState>>,
    updates: Mutex<Vec<(String, BridgeLightState)>>,
}

impl VirtualBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer identification at `address`.
    #[must_use]
    pub fn with_bridge(mut self, address: IpAddr, bridge_id: &str, name: &str) -> Self {
        self.bridges.insert(
            address,
            BridgeDescriptor {
                address,
                bridge_id: bridge_id.to_string(),
                name: name.to_string(),
            },
        );
        self
    }

    /// Expose a light under the bridge's `key`.
    #[must_use]
    pub fn with_light(mut self, key: &str, name: &str) -> Self {
        self.lights.push(BridgeLight {
            key: key.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Refuse every pairing attempt, as a bridge whose link button was not
    /// pressed would.
    #[must_use]
    pub fn rejecting_pairing(mut self) -> Self {
        self.reject_pairing = true;
        self
    }

    /// Accumulated state of one light.
    #[must_use]
    pub fn light_state(&self, key: &str) -> Option<BridgeLightState> {
        lock(&self.states).get(key).copied()
    }

    /// Every update received, in order.
    #[must_use]
    pub fn updates(&self) -> Vec<(String, BridgeLightState)> {
        lock(&self.updates).clone()
    }

    fn push_state(&self, key: &str, update: BridgeLightState) -> Result<(), VirtualError> {
        if !self.lights.iter().any(|light| light.key == key) {
            return Err(VirtualError::UnknownLight(key.to_string()));
        }
        let mut states = lock(&self.states);
        let state = states.entry(key.to_string()).or_default();
        state.on = update.on.or(state.on);
        state.bri = update.bri.or(state.bri);
        state.xy = update.xy.or(state.xy);
        lock(&self.updates).push((key.to_string(), update));
        Ok(())
    }
}

impl BridgeClient for VirtualBridge {
    fn identify(
        &self,
        address: IpAddr,
    ) -> impl Future<Output = Result<Option<BridgeDescriptor>, HestiaError>> + Send {
        let found = self.bridges.get(&address).cloned();
        async { Ok(found) }
    }

    fn pair(
        &self,
        descriptor: &BridgeDescriptor,
    ) -> impl Future<Output = Result<BridgeHandle, HestiaError>> + Send {
        let result = if !self.bridges.contains_key(&descriptor.address) {
            Err(VirtualError::UnknownBridge(descriptor.address).into_hestia(ADAPTER))
        } else if self.reject_pairing {
            Err(VirtualError::PairingRejected.into_hestia(ADAPTER))
        } else {
            Ok(BridgeHandle {
                descriptor: descriptor.clone(),
                token: format!("virtual-{}", descriptor.bridge_id),
            })
        };
        async { result }
    }

    fn list_lights(
        &self,
        _handle: &BridgeHandle,
    ) -> impl Future<Output = Result<Vec<BridgeLight>, HestiaError>> + Send {
        let lights = self.lights.clone();
        async { Ok(lights) }
    }

    fn set_state(
        &self,
        _handle: &BridgeHandle,
        light_key: &str,
        state: BridgeLightState,
    ) -> impl Future<Output = Result<(), HestiaError>> + Send {
        let result = self
            .push_state(light_key, state)
            .map_err(|err| err.into_hestia(ADAPTER));
        tracing::debug!(light = light_key, ok = result.is_ok(), "virtual bridge update");
        async { result }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
