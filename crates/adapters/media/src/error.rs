//! Errors raised by the host media keys.

use hestia_domain::error::HestiaError;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media command is empty")]
    EmptyCommand,

    #[error("'{program}' exited with {status}")]
    Failed { program: String, status: String },

    #[error("could not run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<MediaError> for HestiaError {
    fn from(err: MediaError) -> Self {
        Self::adapter("media", err)
    }
}
