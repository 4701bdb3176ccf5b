use shared::error::{ParamError, ProtocolError};
use thiserror::Error;

use crate::view::{FAILURE_FALLBACK, MISSING_FILE_MESSAGE};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Protocol(#[from] ProtocolError),
    #[error("invalid url '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Why a process command ended without new previews. The `Display` output is
/// the status line shown to the user.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{}", MISSING_FILE_MESSAGE)]
    MissingInput,
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),
    #[error("{}", .0.as_deref().unwrap_or(FAILURE_FALLBACK))]
    Rejected(Option<String>),
    #[error("Error: {0}")]
    Transport(#[from] TransportError),
}

impl ProcessError {
    /// True when the command stopped before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ProcessError::MissingInput | ProcessError::InvalidParameter(_)
        )
    }
}
