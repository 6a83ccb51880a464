//! GraphQL response envelope and executor errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One entry of the `errors` array of a GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlErrorMessage {
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<GraphQlLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

impl fmt::Display for GraphQlErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Position in the query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlLocation {
    pub line: u32,
    pub column: u32,
}

/// The `{data, errors}` envelope every GraphQL endpoint responds with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,

    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

/// Errors produced by a [`GraphQlExecutor`](super::GraphQlExecutor).
///
/// Values are `Clone + PartialEq` so callers (and tests) can compare what
/// came back against what the executor produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphQlError {
    #[error("graphql: {}", first_message(.0))]
    Server(Vec<GraphQlErrorMessage>),

    #[error("graphql: server returned a non-200 status code: {status}")]
    Status { status: u16, body: String },

    #[error("graphql: request failed: {0}")]
    Transport(String),

    #[error("graphql: decoding response: {0}")]
    Decode(String),
}

impl GraphQlError {
    /// True when the endpoint answered and reported errors for the operation
    /// itself, as opposed to an HTTP or network failure.
    pub fn is_server_error(&self) -> bool {
        matches!(self, GraphQlError::Server(_))
    }
}

fn first_message(errors: &[GraphQlErrorMessage]) -> String {
    errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| "unknown error".to_string())
}
