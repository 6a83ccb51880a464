//! Authenticating transport
//!
//! One `reqwest::Client` carrying the bearer token and user agent as default
//! headers. Clones share the same connection pool and header map, so every
//! holder sends identical credentials.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::error::Result;

pub const APPLICATION_JSON: &str = "application/json";

#[derive(Clone)]
pub struct AuthTransport {
    http: reqwest::Client,
}

impl AuthTransport {
    /// Build the transport.
    ///
    /// # Errors
    /// - ClientError::Config if the token or user agent is not a valid header value
    pub fn new(api_token: &str, user_agent: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_token))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .user_agent(HeaderValue::from_str(user_agent)?)
            .default_headers(headers)
            .build()
            .map_err(|e| crate::ClientError::Config(format!("could not build HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    /// Underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl std::fmt::Debug for AuthTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTransport").finish_non_exhaustive()
    }
}
