//! In-memory port fakes shared by the unit tests of this crate.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

use hestia_domain::command::Outcome;
use hestia_domain::error::HestiaError;

use crate::ports::{
    BridgeClient, BridgeDescriptor, BridgeHandle, BridgeLight, BridgeLightState, MediaKeys,
    PortProbe,
};

#[derive(Default)]
pub struct FakeBridge {
    pub bridges: HashMap<IpAddr, BridgeDescriptor>,
    pub lights: Vec<BridgeLight>,
    pub reject_pairing: bool,
    /// Simulated network latency of `identify`.
    pub identify_delay: Option<Duration>,
    pub calls: Mutex<Vec<(String, BridgeLightState)>>,
}

impl FakeBridge {
    pub fn handle() -> BridgeHandle {
        BridgeHandle {
            descriptor: Self::descriptor(Ipv4Addr::new(192, 168, 1, 10).into()),
            token: "token".to_string(),
        }
    }

    pub fn descriptor(address: IpAddr) -> BridgeDescriptor {
        BridgeDescriptor {
            address,
            bridge_id: "001788fffe000000".to_string(),
            name: "Test Bridge".to_string(),
        }
    }

    pub fn at(address: IpAddr, lights: &[(&str, &str)]) -> Self {
        Self {
            bridges: HashMap::from([(address, Self::descriptor(address))]),
            lights: lights
                .iter()
                .map(|(key, name)| BridgeLight {
                    key: (*key).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, BridgeLightState)> {
        self.calls.lock().unwrap().clone()
    }
}

impl BridgeClient for FakeBridge {
    fn identify(
        &self,
        address: IpAddr,
    ) -> impl Future<Output = Result<Option<BridgeDescriptor>, HestiaError>> + Send {
        let found = self.bridges.get(&address).cloned();
        let delay = self.identify_delay;
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Ok(found)
        }
    }

    fn pair(
        &self,
        descriptor: &BridgeDescriptor,
    ) -> impl Future<Output = Result<BridgeHandle, HestiaError>> + Send {
        let result = if self.reject_pairing {
            Err(HestiaError::adapter("bridge", "link button not pressed"))
        } else {
            Ok(BridgeHandle {
                descriptor: descriptor.clone(),
                token: "token".to_string(),
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
        self.calls
            .lock()
            .unwrap()
            .push((light_key.to_string(), state));
        async { Ok(()) }
    }
}

pub struct FakeMediaKeys {
    outcome: Option<Outcome>,
    toggles: Mutex<usize>,
    volumes: Mutex<Vec<u8>>,
}

impl Default for FakeMediaKeys {
    fn default() -> Self {
        Self::with_outcome(Some(Outcome::Confirmed))
    }
}

impl FakeMediaKeys {
    fn with_outcome(outcome: Option<Outcome>) -> Self {
        Self {
            outcome,
            toggles: Mutex::new(0),
            volumes: Mutex::new(Vec::new()),
        }
    }

    pub fn attempting() -> Self {
        Self::with_outcome(Some(Outcome::Attempted))
    }

    pub fn failing() -> Self {
        Self::with_outcome(None)
    }

    pub fn toggles(&self) -> usize {
        *self.toggles.lock().unwrap()
    }

    pub fn volumes(&self) -> Vec<u8> {
        self.volumes.lock().unwrap().clone()
    }

    fn result(&self) -> Result<Outcome, HestiaError> {
        self.outcome
            .ok_or_else(|| HestiaError::adapter("media", "no player running"))
    }
}

impl MediaKeys for FakeMediaKeys {
    fn toggle_play_pause(&self) -> impl Future<Output = Result<Outcome, HestiaError>> + Send {
        *self.toggles.lock().unwrap() += 1;
        let result = self.result();
        async { result }
    }

    fn set_volume(&self, percent: u8) -> impl Future<Output = Result<Outcome, HestiaError>> + Send {
        self.volumes.lock().unwrap().push(percent);
        let result = self.result();
        async { result }
    }
}

#[derive(Default)]
pub struct FakeProbe {
    pub open: HashSet<SocketAddr>,
    /// Simulated latency of every probe.
    pub delay: Option<Duration>,
}

impl PortProbe for FakeProbe {
    fn is_open(&self, address: SocketAddr, _timeout: Duration) -> impl Future<Output = bool> + Send {
        let open = self.open.contains(&address);
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            open
        }
    }
}
