//! Network diagnostics use-cases: ping and outbound fetch.
//!
//! Targets arrive already parsed ([`PingTarget`]) or are vetted here against
//! the [`FetchPolicy`] before any socket or process is touched.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::fetch_policy::ensure_public;
use crate::domain::ports::{
    FetchCommand, FetchError, HostResolver, PingCommand, PingReport, PingRunner, PingRunnerError,
    UrlFetcher,
};
use crate::domain::{Error, FetchPolicy, FetchPolicyError, PingTarget};

/// Service implementing [`PingCommand`] and [`FetchCommand`].
pub struct NetworkService<P, D, F> {
    pinger: Arc<P>,
    resolver: Arc<D>,
    fetcher: Arc<F>,
    policy: FetchPolicy,
}

impl<P, D, F> NetworkService<P, D, F> {
    pub fn new(pinger: Arc<P>, resolver: Arc<D>, fetcher: Arc<F>, policy: FetchPolicy) -> Self {
        Self {
            pinger,
            resolver,
            fetcher,
            policy,
        }
    }
}

fn map_policy_error(error: FetchPolicyError) -> Error {
    match error {
        FetchPolicyError::InvalidUrl
        | FetchPolicyError::SchemeNotAllowed
        | FetchPolicyError::UserinfoNotAllowed => Error::invalid_request(error.to_string()),
        FetchPolicyError::HostNotAllowed | FetchPolicyError::NonPublicAddress => {
            Error::forbidden(error.to_string())
        }
    }
}

fn map_ping_error(error: PingRunnerError) -> Error {
    Error::internal(format!("ping failed: {error}"))
}

fn map_fetch_error(error: FetchError) -> Error {
    Error::internal(format!("fetch failed: {error}"))
}

#[async_trait]
impl<P, D, F> PingCommand for NetworkService<P, D, F>
where
    P: PingRunner,
    D: HostResolver,
    F: UrlFetcher,
{
    async fn ping(&self, target: &PingTarget) -> Result<PingReport, Error> {
        let output = self.pinger.ping(target).await.map_err(map_ping_error)?;
        Ok(PingReport {
            output: output.output,
            reachable: output.success,
        })
    }
}

#[async_trait]
impl<P, D, F> FetchCommand for NetworkService<P, D, F>
where
    P: PingRunner,
    D: HostResolver,
    F: UrlFetcher,
{
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        let target = self.policy.check(url).map_err(|error| {
            warn!(reason = %error, "fetch destination rejected");
            map_policy_error(error)
        })?;
        let addrs = match target.literal() {
            Some(ip) => vec![ip],
            None => self
                .resolver
                .resolve(target.host(), target.port())
                .await
                .map_err(|error| Error::internal(format!("resolution failed: {error}")))?,
        };
        ensure_public(&addrs).map_err(|error| {
            warn!(host = target.host(), ?addrs, "fetch destination resolves to non-public address");
            map_policy_error(error)
        })?;
        self.fetcher
            .fetch(&target, &addrs)
            .await
            .map_err(map_fetch_error)
    }
}
