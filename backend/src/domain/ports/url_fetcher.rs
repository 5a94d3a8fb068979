//! Port for fetching a vetted URL.
use std::net::IpAddr;

use async_trait::async_trait;

use crate::domain::FetchTarget;

use super::define_port_error;

/// Maximum response body size accepted from upstream.
pub const FETCH_MAX_BYTES: usize = 1024 * 1024;

define_port_error! {
    /// Errors raised by URL fetchers.
    pub enum FetchError {
        /// The request could not be built or sent.
        Request { message: String } => "upstream request failed: {message}",
        /// The upstream did not answer in time.
        Timeout => "upstream request timed out",
        /// The body exceeded the size cap.
        TooLarge { limit: usize } => "upstream body exceeded {limit} bytes",
        /// The upstream answered with a redirect, which is never followed.
        Redirected => "upstream redirect refused",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlFetcher: Send + Sync {
    /// Fetch `target`, connecting only to `addrs`.
    async fn fetch(&self, target: &FetchTarget, addrs: &[IpAddr]) -> Result<String, FetchError>;
}
