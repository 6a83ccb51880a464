//! Client configuration

use crate::trace::TraceSink;

/// Buildkite REST API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.buildkite.com/";
/// Buildkite GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://graphql.buildkite.com/v1";
pub const DEFAULT_USER_AGENT: &str = concat!("buildkite-client/", env!("CARGO_PKG_VERSION"));

pub const ENV_ORGANIZATION_SLUG: &str = "BUILDKITE_ORGANIZATION_SLUG";
pub const ENV_API_TOKEN: &str = "BUILDKITE_API_TOKEN";
pub const ENV_USER_AGENT: &str = "BUILDKITE_USER_AGENT";
pub const ENV_REST_URL: &str = "BUILDKITE_REST_URL";
pub const ENV_GRAPHQL_URL: &str = "BUILDKITE_GRAPHQL_URL";

/// Everything needed to build a [`Client`](crate::Client).
#[derive(Clone)]
pub struct ClientConfig {
    pub organization_slug: String,
    pub api_token: String,
    pub user_agent: String,
    pub base_url: String,
    pub graphql_url: String,
    pub trace: TraceSink,
}

impl ClientConfig {
    /// Config pointed at the public Buildkite endpoints.
    pub fn new(
        organization_slug: impl Into<String>,
        api_token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            organization_slug: organization_slug.into(),
            api_token: api_token.into(),
            user_agent: user_agent.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            trace: TraceSink::default(),
        }
    }

    /// Load from `BUILDKITE_*` environment variables.
    ///
    /// Missing organization or token become empty strings; endpoints and the
    /// user agent fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup(ENV_ORGANIZATION_SLUG).unwrap_or_default(),
            lookup(ENV_API_TOKEN).unwrap_or_default(),
            lookup(ENV_USER_AGENT).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );
        if let Some(url) = lookup(ENV_REST_URL) {
            config.base_url = url;
        }
        if let Some(url) = lookup(ENV_GRAPHQL_URL) {
            config.graphql_url = url;
        }
        config
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = url.into();
        self
    }

    pub fn trace(mut self, trace: TraceSink) -> Self {
        self.trace = trace;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("organization_slug", &self.organization_slug)
            .field("api_token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .field("graphql_url", &self.graphql_url)
            .finish()
    }
}
