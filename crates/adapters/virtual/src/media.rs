//! Virtual media keys.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use hestia_app::ports::MediaKeys;
use hestia_domain::command::Outcome;
use hestia_domain::error::HestiaError;

use crate::error::VirtualError;

/// A key press received by [`VirtualMediaKeys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    PlayPause,
    Volume(u8),
}

/// Media keys that only remember what was pressed.
#[derive(Debug)]
pub struct VirtualMediaKeys {
    outcome: Option<Outcome>,
    presses: Mutex<Vec<KeyPress>>,
}

impl Default for VirtualMediaKeys {
    fn default() -> Self {
        Self::with_outcome(Outcome::Confirmed)
    }
}

impl VirtualMediaKeys {
    /// Report `outcome` for every press.
    #[must_use]
    pub fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome: Some(outcome),
            presses: Mutex::new(Vec::new()),
        }
    }

    /// Fail every press.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            outcome: None,
            presses: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn presses(&self) -> Vec<KeyPress> {
        self.presses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn press(&self, key: KeyPress) -> Result<Outcome, HestiaError> {
        let outcome = self
            .outcome
            .ok_or_else(|| VirtualError::MediaUnavailable.into_hestia("media"))?;
        self.presses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key);
        tracing::debug!(?key, "virtual media key pressed");
        Ok(outcome)
    }
}

impl MediaKeys for VirtualMediaKeys {
    fn toggle_play_pause(&self) -> impl Future<Output = Result<Outcome, HestiaError>> + Send {
        let result = self.press(KeyPress::PlayPause);
        async { result }
    }

    fn set_volume(&self, percent: u8) -> impl Future<Output = Result<Outcome, HestiaError>> + Send {
        let result = self.press(KeyPress::Volume(percent));
        async { result }
    }
}
