//! Media-key port: best-effort control of whatever the host is playing.

use std::future::Future;

use hestia_domain::command::Outcome;
use hestia_domain::error::HestiaError;

/// Host media keys.
///
/// Implementations return [`Outcome::Attempted`] when the key press was sent
/// but its effect cannot be observed, and an error only when the call itself
/// failed.
pub trait MediaKeys: Send + Sync {
    fn toggle_play_pause(&self) -> impl Future<Output = Result<Outcome, HestiaError>> + Send;

    /// Set the output volume, in percent.
    fn set_volume(&self, percent: u8)
    -> impl Future<Output = Result<Outcome, HestiaError>> + Send;
}
