//! GraphQL request/response types and the executor port.

mod executor;
mod request;
mod response;

pub use executor::{mocks, GraphQlExecutor, HttpGraphQlExecutor, ResponseHook};
pub use request::GraphQlRequest;
pub use response::{GraphQlError, GraphQlErrorMessage, GraphQlLocation, GraphQlResponse};
