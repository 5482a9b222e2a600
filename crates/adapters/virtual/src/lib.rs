//! # hestia-adapter-virtual
//!
//! In-memory implementations of the hestia ports.
//!
//! ## Responsibilities
//! - `VirtualBridge`: a scripted lighting bridge that answers identification,
//!   accepts or rejects pairing, and records every state update it receives
//! - `VirtualMediaKeys`: media keys that record presses and report a fixed
//!   outcome
//! - `VirtualProbe`: a port probe answering from a fixed set of open sockets
//!
//! Used by the daemon's `virtual` media backend and by tests that need the
//! full stack without a network.

pub mod bridge;
pub mod error;
pub mod media;
pub mod probe;

pub use bridge::VirtualBridge;
pub use error::VirtualError;
pub use media::{KeyPress, VirtualMediaKeys};
pub use probe::VirtualProbe;
