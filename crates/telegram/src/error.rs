use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The inbound update could not be turned into a message context.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("failed to decode update: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("update {update_id} carries no message")]
    MissingMessage { update_id: i64 },
    #[error("message in update {update_id} carries no chat")]
    MissingChat { update_id: i64 },
}

/// A reply could not be delivered.
///
/// Transport errors are stored without their request URL, which embeds the
/// bot token.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("{method} request failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} rejected with status {status}: {description}")]
    Api {
        method: &'static str,
        status: u16,
        description: String,
    },
    #[error("failed to read photo {}: {source}", .path.display())]
    ReadPhoto {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to build bot client: {0}")]
    Client(#[source] reqwest::Error),
}

impl DeliveryError {
    pub(crate) fn transport(method: &'static str, err: reqwest::Error) -> Self {
        DeliveryError::Transport {
            method,
            source: err.without_url(),
        }
    }
}
