//! # hestia-adapter-media
//!
//! Best-effort control of whatever is playing on the host.
//!
//! Each key maps to an external command line. A command that exits
//! successfully confirms the change; a missing program or a platform without
//! a known command degrades to an unconfirmed attempt rather than an error.

pub mod error;
pub mod keys;

pub use error::MediaError;
pub use keys::{HostMediaKeys, MediaCommands};
