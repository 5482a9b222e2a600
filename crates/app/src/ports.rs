//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the home core and the outside world.
//! They live here so that both the services and the adapter crates can
//! depend on them without a cycle.

pub mod bridge;
pub mod media;
pub mod probe;

pub use bridge::{BridgeClient, BridgeDescriptor, BridgeHandle, BridgeLight, BridgeLightState};
pub use media::MediaKeys;
pub use probe::PortProbe;
