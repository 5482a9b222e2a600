//! # hestia-domain
//!
//! Pure domain model for the hestia home orchestration core.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy
//! - Define **Devices** (lights, media players, bare network hosts) with an
//!   immutable capability set and a per-kind state sum type
//! - Define **Commands** (`turn_on`, `set_brightness`, `set_volume`, …) and the
//!   capability each one requires
//! - Define **Scenes** (named, ordered batches of typed actions)
//! - Define **Intents** (what a free-text command was classified as)
//! - Contain all invariant enforcement: capability gating and value clamping
//!   live here, so no caller can bypass them
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod color;
pub mod command;
pub mod device;
pub mod intent;
pub mod scene;
pub mod selector;
pub mod time;
