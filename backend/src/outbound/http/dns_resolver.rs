//! `HostResolver` adapter over the system resolver.

use std::net::IpAddr;

use async_trait::async_trait;
use tokio::net::lookup_host;

use crate::domain::ports::{HostResolver, ResolveError};

/// Resolves names with `tokio::net::lookup_host`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioHostResolver;

#[async_trait]
impl HostResolver for TokioHostResolver {
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<IpAddr>, ResolveError> {
        let addrs = lookup_host((host, port))
            .await
            .map_err(|err| ResolveError::lookup(err.to_string()))?;
        let mut ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
        ips.sort_unstable();
        ips.dedup();
        if ips.is_empty() {
            return Err(ResolveError::lookup(format!("{host} has no addresses")));
        }
        Ok(ips)
    }
}
