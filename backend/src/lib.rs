//! Bastion library modules.
//!
//! The binary in `main.rs` only loads configuration and calls into
//! [`server`]; everything else lives here so integration tests can assemble
//! the same application.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
