//! # hestia-app
//!
//! Application layer: the running home core and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `BridgeClient`: identify, pair and drive a third-party lighting bridge
//!   - `MediaKeys`: best-effort host media keys
//!   - `PortProbe`: TCP reachability checks for the generic discovery probe
//! - Own the **device registry** with per-device locking
//! - Route typed commands through the **dispatcher** to the right platform
//! - Store and replay **scenes**
//! - Classify free text with the keyword **interpreter**
//! - Populate the registry with the bounded **discovery** session
//! - Tie everything together behind the [`home::Home`] facade
//!
//! ## Dependency rule
//! Depends on `hestia-domain` only (plus `tokio` for locks, timers and the
//! discovery worker pool). Never imports adapter crates.

pub mod bootstrap;
pub mod discovery;
pub mod dispatcher;
pub mod home;
pub mod interpreter;
pub mod ports;
pub mod registry;
pub mod scene_engine;

#[cfg(test)]
pub(crate) mod testing;
