use thiserror::Error;

use crate::types::ErrorKind;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a failed envelope.
    #[error("{message}")]
    Api { kind: ErrorKind, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ClientError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
