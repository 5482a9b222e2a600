//! Media backend chosen by configuration.

use std::future::Future;

use serde::Deserialize;

use hestia_adapter_media::HostMediaKeys;
use hestia_adapter_virtual::VirtualMediaKeys;
use hestia_app::ports::MediaKeys;
use hestia_domain::command::Outcome;
use hestia_domain::error::HestiaError;

/// `[media] backend` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Drive the host's player and mixer.
    #[default]
    Host,
    /// Record presses only.
    Virtual,
}

/// Either media-keys implementation behind one type, so the home stays
/// statically dispatched.
#[derive(Debug)]
pub enum MediaBackend {
    Host(HostMediaKeys),
    Virtual(VirtualMediaKeys),
}

impl From<BackendKind> for MediaBackend {
    fn from(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Host => Self::Host(HostMediaKeys::for_host()),
            BackendKind::Virtual => Self::Virtual(VirtualMediaKeys::default()),
        }
    }
}

impl MediaKeys for MediaBackend {
    fn toggle_play_pause(&self) -> impl Future<Output = Result<Outcome, HestiaError>> + Send {
        async move {
            match self {
                Self::Host(keys) => keys.toggle_play_pause().await,
                Self::Virtual(keys) => keys.toggle_play_pause().await,
            }
        }
    }

    fn set_volume(&self, percent: u8) -> impl Future<Output = Result<Outcome, HestiaError>> + Send {
        async move {
            match self {
                Self::Host(keys) => keys.set_volume(percent).await,
                Self::Virtual(keys) => keys.set_volume(percent).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_delegate_to_virtual_keys() {
        let backend = MediaBackend::from(BackendKind::Virtual);
        assert_eq!(backend.set_volume(30).await.unwrap(), Outcome::Confirmed);
        let MediaBackend::Virtual(keys) = &backend else {
            panic!("expected virtual backend");
        };
        assert_eq!(keys.presses().len(), 1);
    }

    #[test]
    fn should_parse_backend_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: BackendKind,
        }
        let parsed: Wrapper = toml::from_str("backend = 'virtual'").unwrap();
        assert_eq!(parsed.backend, BackendKind::Virtual);
        assert!(toml::from_str::<Wrapper>("backend = 'bluetooth'").is_err());
    }
}
