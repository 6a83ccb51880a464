//! GraphQL Executor Port
//!
//! The client talks to GraphQL through [`GraphQlExecutor`]. The production
//! adapter is [`HttpGraphQlExecutor`], which POSTs over the shared
//! authenticating transport.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use super::request::GraphQlRequest;
use super::response::{GraphQlError, GraphQlResponse};
use crate::transport::{AuthTransport, APPLICATION_JSON};

/// Callback receiving every raw response body.
pub type ResponseHook = Arc<dyn Fn(&str) + Send + Sync>;

/// GraphQL Executor trait
///
/// Implementations:
/// - HttpGraphQlExecutor: POST over HTTP
/// - mocks::MockGraphQlExecutor: scripted responses for tests
#[async_trait]
pub trait GraphQlExecutor: Send + Sync {
    /// Execute an operation and return its `data` member.
    ///
    /// # Errors
    /// - GraphQlError::Server if the response carries an `errors` array
    /// - GraphQlError::Status if the endpoint answered non-2xx without a GraphQL body
    /// - GraphQlError::Transport if the request could not be sent or read
    /// - GraphQlError::Decode if a 2xx body is not a GraphQL response
    async fn run(&self, request: &GraphQlRequest) -> Result<Value, GraphQlError>;

    /// Endpoint the executor sends operations to.
    fn endpoint(&self) -> &str;
}

/// Executes operations by POSTing them to a GraphQL endpoint.
pub struct HttpGraphQlExecutor {
    endpoint: Url,
    transport: AuthTransport,
    on_response: Option<ResponseHook>,
}

impl HttpGraphQlExecutor {
    pub fn new(endpoint: Url, transport: AuthTransport) -> Self {
        Self {
            endpoint,
            transport,
            on_response: None,
        }
    }

    /// Install a hook called with each raw response body before decoding.
    pub fn on_response(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_response = Some(Arc::new(hook));
        self
    }

    fn decode(status: reqwest::StatusCode, body: String) -> Result<Value, GraphQlError> {
        match serde_json::from_str::<GraphQlResponse>(&body) {
            Ok(envelope) if !envelope.errors.is_empty() => Err(GraphQlError::Server(envelope.errors)),
            Ok(envelope) if status.is_success() => Ok(envelope.data.unwrap_or(Value::Null)),
            Err(e) if status.is_success() => Err(GraphQlError::Decode(e.to_string())),
            _ => Err(GraphQlError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[async_trait]
impl GraphQlExecutor for HttpGraphQlExecutor {
    async fn run(&self, request: &GraphQlRequest) -> Result<Value, GraphQlError> {
        let response = self
            .transport
            .http()
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .json(request)
            .send()
            .await
            .map_err(|e| GraphQlError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GraphQlError::Transport(e.to_string()))?;

        if let Some(hook) = &self.on_response {
            hook(&body);
        }

        Self::decode(status, body)
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl std::fmt::Debug for HttpGraphQlExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGraphQlExecutor")
            .field("endpoint", &self.endpoint.as_str())
            .field("on_response", &self.on_response.is_some())
            .finish()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always return this `data` value
        Respond(Value),
        /// Always fail with this error
        Fail(GraphQlError),
        /// Sleep, then return this `data` value
        Delay(Duration, Value),
    }

    /// Mock GraphQL executor for testing
    pub struct MockGraphQlExecutor {
        behavior: Mutex<MockBehavior>,
        requests: Mutex<Vec<GraphQlRequest>>,
    }

    impl MockGraphQlExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Mutex::new(behavior),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn new_respond(data: Value) -> Self {
            Self::new(MockBehavior::Respond(data))
        }

        pub fn new_fail(error: GraphQlError) -> Self {
            Self::new(MockBehavior::Fail(error))
        }

        pub fn new_delay(delay: Duration, data: Value) -> Self {
            Self::new(MockBehavior::Delay(delay, data))
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_request(&self) -> Option<GraphQlRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl GraphQlExecutor for MockGraphQlExecutor {
        async fn run(&self, request: &GraphQlRequest) -> Result<Value, GraphQlError> {
            self.requests.lock().unwrap().push(request.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Respond(data) => Ok(data),
                MockBehavior::Fail(error) => Err(error),
                MockBehavior::Delay(delay, data) => {
                    tokio::time::sleep(delay).await;
                    Ok(data)
                }
            }
        }

        fn endpoint(&self) -> &str {
            "mock://graphql"
        }
    }
}
