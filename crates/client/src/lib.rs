//! Buildkite API Client
//!
//! A thin client for the Buildkite REST and GraphQL APIs. One authenticating
//! transport (bearer token + user agent) is shared by both kinds of call;
//! request and response payloads are emitted as `TRACE` events.
//!
//! # Example
//!
//! ```no_run
//! use buildkite_client::{CallContext, Client, GraphQlRequest};
//! use serde_json::Value;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("acme", "bkua_token", "my-tool/1.0")?;
//!
//!     // GraphQL
//!     let request = GraphQlRequest::new("query($slug: ID!) { pipeline(slug: $slug) { name } }")
//!         .var("slug", client.org_slug("deploy"))?;
//!     let data: Value = client
//!         .graphql_request(&request, &CallContext::background())
//!         .await?;
//!     println!("{data}");
//!
//!     // REST, bounded to 10 seconds
//!     let ctx = CallContext::background().with_timeout(Duration::from_secs(10));
//!     let builds: Value = client
//!         .get("v2/organizations/acme/pipelines/deploy/builds", &ctx)
//!         .await?;
//!     println!("{builds}");
//!
//!     Ok(())
//! }
//! ```

mod body;
mod client;
mod config;
mod context;
mod error;
pub mod graphql;
mod trace;
mod transport;

pub use body::{marshal_body, unmarshal_response};
pub use client::Client;
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_GRAPHQL_URL, DEFAULT_USER_AGENT, ENV_API_TOKEN,
    ENV_GRAPHQL_URL, ENV_ORGANIZATION_SLUG, ENV_REST_URL, ENV_USER_AGENT,
};
pub use context::CallContext;
pub use error::{BoxError, ClientError, Result};
pub use graphql::{GraphQlError, GraphQlExecutor, GraphQlRequest, HttpGraphQlExecutor};
pub use trace::{TraceSink, TRACE_TARGET};
pub use transport::{AuthTransport, APPLICATION_JSON};

// Re-exported so callers can name methods and build cancellation tokens
// without extra dependencies.
pub use reqwest::Method;
pub use tokio_util::sync::CancellationToken;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
