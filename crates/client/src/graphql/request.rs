//! GraphQL request type.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// A prepared GraphQL operation: query text plus variables.
///
/// Serializes to the standard GraphQL-over-HTTP body
/// (`{"query": ..., "variables": {...}, "operationName": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,

    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
            operation_name: None,
        }
    }

    /// Set one variable.
    ///
    /// # Errors
    /// - ClientError::Marshal if `value` cannot be represented as JSON
    pub fn var(mut self, name: impl Into<String>, value: impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(ClientError::Marshal)?;
        self.variables.insert(name.into(), value);
        Ok(self)
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}
