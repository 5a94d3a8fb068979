//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, namely trace
//! correlation and browser hardening headers.

pub mod security_headers;
pub mod trace;

pub use security_headers::security_headers;
pub use trace::Trace;
