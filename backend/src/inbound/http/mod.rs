//! HTTP inbound adapter exposing the service's endpoints.
//!
//! Handlers parse request bodies into validated domain types before calling
//! a port, so hostile input is refused at the edge with a 400.

pub mod auth;
pub mod catalogue;
pub mod diagnostics;
pub mod error;
pub mod files;
pub mod hashing;
pub mod health;
pub mod import;
pub mod network;
pub mod redirect;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
