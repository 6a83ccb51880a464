//! Buildkite Client Implementation

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::body::{marshal_body, unmarshal_response};
use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::error::{ClientError, Result};
use crate::graphql::{GraphQlExecutor, GraphQlRequest, HttpGraphQlExecutor};
use crate::trace::TraceSink;
use crate::transport::{AuthTransport, APPLICATION_JSON};

/// Buildkite API Client
///
/// Holds one authenticating transport shared by REST calls and the GraphQL
/// executor, so both kinds of call carry the same credentials. Cloning is
/// cheap and shares everything.
///
/// # Example
///
/// ```no_run
/// use buildkite_client::{CallContext, Client, GraphQlRequest};
/// use serde_json::Value;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("acme", "bkua_token", "my-tool/1.0")?;
///
/// let request = GraphQlRequest::new("query($slug: ID!) { pipeline(slug: $slug) { name } }")
///     .var("slug", client.org_slug("deploy"))?;
/// let data: Value = client
///     .graphql_request(&request, &CallContext::background())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: AuthTransport,
    graphql: Arc<dyn GraphQlExecutor>,
    base_url: Url,
    organization_slug: String,
    api_token: String,
    trace: TraceSink,
}

impl Client {
    /// Create a client for the public Buildkite endpoints.
    ///
    /// # Arguments
    ///
    /// * `organization_slug` - Organization every slug is scoped to
    /// * `api_token` - Bearer token sent on every request
    /// * `user_agent` - `User-Agent` sent on every request
    ///
    /// # Errors
    /// - ClientError::Config if the token or user agent is not a valid header value
    pub fn new(organization_slug: &str, api_token: &str, user_agent: &str) -> Result<Self> {
        Self::from_config(ClientConfig::new(organization_slug, api_token, user_agent))
    }

    /// Create a client from a full configuration.
    ///
    /// The GraphQL executor gets a clone of the REST transport and a
    /// response hook that traces every raw response body.
    ///
    /// # Errors
    /// - ClientError::Config if an endpoint URL or header value is invalid
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let hook_trace = config.trace.clone();

        Self::with_executor(config, move |graphql_url, transport| {
            Arc::new(
                HttpGraphQlExecutor::new(graphql_url, transport)
                    .on_response(move |body| hook_trace.response_hook(body)),
            )
        })
    }

    /// Create a client whose GraphQL executor is built by `build`.
    ///
    /// `build` receives the validated GraphQL endpoint and a clone of the
    /// client's own authenticating transport; an executor that talks HTTP
    /// must send through that transport.
    ///
    /// # Errors
    /// - ClientError::Config if an endpoint URL or header value is invalid
    pub fn with_executor<F>(config: ClientConfig, build: F) -> Result<Self>
    where
        F: FnOnce(Url, AuthTransport) -> Arc<dyn GraphQlExecutor>,
    {
        let transport = AuthTransport::new(&config.api_token, &config.user_agent)?;
        let graphql_url = parse_endpoint(&config.graphql_url)?;
        let base_url = parse_endpoint(&config.base_url)?;
        let graphql = build(graphql_url, transport.clone());

        tracing::debug!(
            organization = %config.organization_slug,
            base_url = %base_url,
            graphql_url = %graphql.endpoint(),
            "Buildkite client configured"
        );

        Ok(Self {
            transport,
            graphql,
            base_url,
            organization_slug: config.organization_slug,
            api_token: config.api_token,
            trace: config.trace,
        })
    }

    pub fn organization_slug(&self) -> &str {
        &self.organization_slug
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn graphql_url(&self) -> &str {
        self.graphql.endpoint()
    }

    /// Scope a resource slug to this client's organization.
    ///
    /// ```
    /// # use buildkite_client::Client;
    /// let client = Client::new("acme", "tok", "ua").unwrap();
    /// assert_eq!(client.org_slug("pipeline-1"), "acme/pipeline-1");
    /// ```
    pub fn org_slug(&self, slug: &str) -> String {
        format!("{}/{}", self.organization_slug, slug)
    }

    /// Run a GraphQL operation and decode its `data` into `T`.
    ///
    /// Executor failures are traced and returned as `ClientError::GraphQl`
    /// holding the executor's error unchanged.
    pub async fn graphql_request<T>(&self, request: &GraphQlRequest, ctx: &CallContext) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.trace
            .graphql_request(&serde_json::to_string_pretty(request).unwrap_or_default());

        let result = ctx
            .run(async { self.graphql.run(request).await.map_err(ClientError::GraphQl) })
            .await;

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                self.trace.graphql_error(&e);
                return Err(e);
            }
        };

        self.trace
            .graphql_response(&serde_json::to_string_pretty(&data).unwrap_or_default());

        serde_json::from_value(data).map_err(ClientError::Unmarshal)
    }

    /// Send a REST request relative to the base URL and decode the JSON reply.
    ///
    /// # Errors
    /// - ClientError::Marshal if `body` cannot be serialized
    /// - ClientError::Transport if the request cannot be sent
    /// - ClientError::UnexpectedStatus for non-2xx replies
    /// - ClientError::ReadBody / ClientError::Unmarshal for unreadable or mismatched bodies
    pub async fn rest_request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        ctx: &CallContext,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = ctx.run(self.send(method, path, body)).await?;
        unmarshal_response(bytes.as_slice(), &self.trace)
    }

    pub async fn get<T>(&self, path: &str, ctx: &CallContext) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.rest_request::<(), T>(Method::GET, path, None, ctx).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B, ctx: &CallContext) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.rest_request(Method::POST, path, Some(body), ctx).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B, ctx: &CallContext) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.rest_request(Method::PUT, path, Some(body), ctx).await
    }

    /// Send a DELETE; the reply body (usually empty) is traced, not decoded.
    pub async fn delete(&self, path: &str, ctx: &CallContext) -> Result<()> {
        let bytes = ctx.run(self.send::<()>(Method::DELETE, path, None)).await?;
        self.trace.response_body(&bytes);
        Ok(())
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;
        let mut request = self.transport.http().request(method.clone(), url.clone());

        if let Some(reader) = marshal_body(body, &self.trace)? {
            request = request
                .header(CONTENT_TYPE, APPLICATION_JSON)
                .body(reader.into_inner());
        }

        tracing::debug!(method = %method, url = %url, "Buildkite request");

        let response = request.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::ReadBody(Box::new(e)))?
            .to_vec();

        if !status.is_success() {
            self.trace.response_body(&bytes);
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("organization_slug", &self.organization_slug)
            .field("base_url", &self.base_url.as_str())
            .field("graphql_url", &self.graphql.endpoint())
            .finish_non_exhaustive()
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(ClientError::Config(format!("not a base URL: {}", raw)));
    }
    Ok(url)
}
