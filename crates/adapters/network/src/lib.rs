//! # hestia-adapter-network
//!
//! Real-network implementations of the discovery ports.
//!
//! ## Responsibilities
//! - `HttpBridge`: identifies lighting bridges by their `/api/config`
//!   document. Pairing and light control are not implemented; a paired
//!   bridge is never produced, so discovery reports a pairing warning.
//! - `TcpProbe`: TCP connect with a timeout
//! - `local_ipv4`: the address this host uses on the LAN, so discovery can
//!   skip itself and derive the network to scan

pub mod bridge;
pub mod error;
pub mod local;
pub mod probe;

pub use bridge::HttpBridge;
pub use error::NetworkError;
pub use local::local_ipv4;
pub use probe::TcpProbe;
