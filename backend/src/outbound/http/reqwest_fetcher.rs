//! Reqwest-backed `UrlFetcher`.
//!
//! Each fetch builds a client whose resolver is pinned to the addresses the
//! domain already vetted, so a second DNS answer cannot redirect the
//! connection. Redirects are never followed and the body is read in chunks up
//! to a byte cap.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::domain::FetchTarget;
use crate::domain::ports::{FETCH_MAX_BYTES, FetchError, UrlFetcher};

const USER_AGENT: &str = "bastion-fetch/0.1";

/// Fetches vetted URLs over HTTP(S) with rustls.
#[derive(Debug, Clone)]
pub struct ReqwestUrlFetcher {
    timeout: Duration,
    max_bytes: usize,
}

impl ReqwestUrlFetcher {
    /// Fetcher with the default body cap.
    pub fn new(timeout: Duration) -> Self {
        Self::with_limit(timeout, FETCH_MAX_BYTES)
    }

    /// Fetcher with an explicit body cap in bytes.
    pub fn with_limit(timeout: Duration, max_bytes: usize) -> Self {
        Self { timeout, max_bytes }
    }

    fn client(&self, target: &FetchTarget, addrs: &[IpAddr]) -> Result<Client, FetchError> {
        let pinned: Vec<SocketAddr> = addrs
            .iter()
            .map(|ip| SocketAddr::new(*ip, target.port()))
            .collect();
        Client::builder()
            .redirect(Policy::none())
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .resolve_to_addrs(target.host(), &pinned)
            .build()
            .map_err(|err| FetchError::request(err.to_string()))
    }
}

fn map_transport_error(error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout()
    } else {
        FetchError::request(error.to_string())
    }
}

fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_redirection() {
        return Err(FetchError::redirected());
    }
    if !status.is_success() {
        return Err(FetchError::request(format!("status {}", status.as_u16())));
    }
    Ok(())
}

#[async_trait]
impl UrlFetcher for ReqwestUrlFetcher {
    async fn fetch(&self, target: &FetchTarget, addrs: &[IpAddr]) -> Result<String, FetchError> {
        if addrs.is_empty() {
            return Err(FetchError::request("no vetted addresses"));
        }
        let client = self.client(target, addrs)?;
        let mut response = client
            .get(target.url().clone())
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        check_status(response.status())?;

        let too_large = FetchError::too_large(self.max_bytes);
        let cap = u64::try_from(self.max_bytes).unwrap_or(u64::MAX);
        if response.content_length().is_some_and(|len| len > cap) {
            return Err(too_large);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|err| map_transport_error(&err))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }
        debug!(host = target.host(), bytes = body.len(), "upstream fetch complete");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
