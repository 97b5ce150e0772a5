//! Errors raised while submitting a statement request and saving the result.

use statement_core::StatementError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for statement-client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-2xx status. `body` is its diagnostic text.
    #[error("statement service responded with status {status}: {body}")]
    RemoteStatement { status: u16, body: String },

    /// No response was received (connection refused, DNS failure, timeout...).
    #[error("could not reach statement service: {0}")]
    Transport(String),

    #[error("invalid statement service URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to encode statement request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to save statement to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Statement(#[from] StatementError),
}

impl ClientError {
    /// Message suitable for showing to the person who submitted the form.
    ///
    /// Remote rejections and transport failures read the same way.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::RemoteStatement { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    format!("Failed to generate statement: server responded with status {status}")
                } else {
                    format!("Failed to generate statement: server responded with status {status}: {body}")
                }
            }
            ClientError::Transport(msg) => format!("Failed to generate statement: {msg}"),
            other => other.to_string(),
        }
    }
}
