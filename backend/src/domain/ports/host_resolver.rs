//! Port for DNS resolution ahead of outbound fetches.
use std::net::IpAddr;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by host resolvers.
    pub enum ResolveError {
        /// Resolution failed or returned no addresses.
        Lookup { message: String } => "host lookup failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Every address `host` resolves to.
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<IpAddr>, ResolveError>;
}
