//! Shared application state for axum handlers.

use std::sync::Arc;

use hestia_app::home::Home;
use hestia_app::ports::{BridgeClient, MediaKeys};

/// Application state shared across all axum handlers.
///
/// Generic over the bridge client and media keys to avoid dynamic dispatch.
/// `Clone` is implemented manually so only the `Arc` is cloned.
pub struct AppState<B, M> {
    pub home: Arc<Home<B, M>>,
}

impl<B, M> Clone for AppState<B, M> {
    fn clone(&self) -> Self {
        Self {
            home: Arc::clone(&self.home),
        }
    }
}

impl<B, M> AppState<B, M>
where
    B: BridgeClient + 'static,
    M: MediaKeys + 'static,
{
    pub fn new(home: Home<B, M>) -> Self {
        Self {
            home: Arc::new(home),
        }
    }

    /// Use when the home is shared with other tasks before serving.
    pub fn from_arc(home: Arc<Home<B, M>>) -> Self {
        Self { home }
    }
}
