//! Payload tracing
//!
//! Every request and response payload the client handles is emitted as a
//! `TRACE` event under the [`TRACE_TARGET`] target. Where those events go is
//! decided by the [`TraceSink`] the client was built with.

use tracing::Dispatch;

/// Target used for all payload trace events.
pub const TRACE_TARGET: &str = "buildkite_client::trace";

/// Destination for payload trace events.
///
/// - [`TraceSink::ambient`] (the default) emits to the process subscriber,
///   which discards everything unless the application installed one.
/// - [`TraceSink::new`] routes events to the given dispatcher only.
/// - [`TraceSink::disabled`] drops them.
#[derive(Debug, Clone, Default)]
pub struct TraceSink {
    dispatch: Option<Dispatch>,
}

impl TraceSink {
    pub fn ambient() -> Self {
        Self { dispatch: None }
    }

    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Dispatch::none())
    }

    fn emit(&self, event: impl FnOnce()) {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, event),
            None => event(),
        }
    }

    pub(crate) fn graphql_request(&self, pretty: &str) {
        self.emit(|| tracing::trace!(target: TRACE_TARGET, "GraphQL request {}", pretty));
    }

    pub(crate) fn graphql_response(&self, pretty: &str) {
        self.emit(|| tracing::trace!(target: TRACE_TARGET, "GraphQL response {}", pretty));
    }

    pub(crate) fn graphql_error(&self, error: &dyn std::fmt::Display) {
        self.emit(|| tracing::trace!(target: TRACE_TARGET, "GraphQL error {}", error));
    }

    pub(crate) fn response_hook(&self, raw: &str) {
        self.emit(|| tracing::trace!(target: TRACE_TARGET, "Response body:\n{}", raw));
    }

    pub(crate) fn request_body(&self, bytes: &[u8]) {
        self.emit(|| {
            tracing::trace!(
                target: TRACE_TARGET,
                "Buildkite Request body {}",
                String::from_utf8_lossy(bytes)
            )
        });
    }

    pub(crate) fn response_body(&self, bytes: &[u8]) {
        self.emit(|| {
            tracing::trace!(
                target: TRACE_TARGET,
                "Buildkite Response body {}",
                String::from_utf8_lossy(bytes)
            )
        });
    }
}
