//! Driving ports for the network diagnostics endpoints.

use async_trait::async_trait;

use crate::domain::{Error, PingTarget};

/// Outcome of a ping run as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingReport {
    pub output: String,
    pub reachable: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PingCommand: Send + Sync {
    /// Ping a validated target.
    async fn ping(&self, target: &PingTarget) -> Result<PingReport, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchCommand: Send + Sync {
    /// Fetch `url` after applying the destination policy.
    async fn fetch(&self, url: &str) -> Result<String, Error>;
}
