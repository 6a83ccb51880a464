//! Client Error Types

use thiserror::Error;

use crate::graphql::GraphQlError;

/// Boxed cause for failures that can come from more than one I/O source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Client Result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client Error
///
/// Wrapping variants keep their cause as the error source, so the full
/// chain can be walked with [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not marshal body")]
    Marshal(#[source] serde_json::Error),

    #[error("could not read response body")]
    ReadBody(#[source] BoxError),

    #[error("could not unmarshal response body")]
    Unmarshal(#[source] serde_json::Error),

    /// Executor failure, passed through untouched.
    #[error(transparent)]
    GraphQl(GraphQlError),

    #[error("request failed")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("call cancelled")]
    Cancelled,

    #[error("call deadline exceeded")]
    DeadlineExceeded,
}

impl ClientError {
    /// The executor error, if this failure came from a GraphQL call.
    pub fn as_graphql(&self) -> Option<&GraphQlError> {
        match self {
            ClientError::GraphQl(e) => Some(e),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::Config(format!("invalid URL: {}", e))
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ClientError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ClientError::Config(format!("invalid header value: {}", e))
    }
}
