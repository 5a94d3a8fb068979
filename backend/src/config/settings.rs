//! Application settings loaded via OrthoConfig.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_UPLOADS_DIR: &str = "./uploads";
const DEFAULT_PING_PROGRAM: &str = "ping";
const DEFAULT_PING_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Settings controlling the listener, adapters and allow-lists.
///
/// List-valued settings accept a comma separated environment variable, for
/// example `BASTION_FETCH_ALLOWED_HOSTS=api.example.com,cdn.example.com`. A
/// single entry has no comma to split on, so it is written as a JSON array:
/// `BASTION_CORS_ALLOWED_ORIGINS='["https://shop.example.com"]'`.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BASTION")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Directory served by `GET /download`.
    pub uploads_dir: Option<PathBuf>,
    /// Hosts `POST /fetch-url` may contact.
    pub fetch_allowed_hosts: Option<Vec<String>>,
    /// Permit plain `http` for fetch destinations.
    #[ortho_config(default = false)]
    pub fetch_allow_http: bool,
    /// Hosts `GET /redirect` may send browsers to.
    pub redirect_allowed_hosts: Option<Vec<String>>,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub cors_allowed_origins: Option<Vec<String>>,
    /// Program executed for `POST /ping`.
    pub ping_program: Option<String>,
    pub ping_timeout_secs: Option<u64>,
    pub fetch_timeout_secs: Option<u64>,
    /// Lifetime of issued bearer tokens.
    pub token_ttl_minutes: Option<i64>,
    /// Username of the bootstrapped administrator.
    pub admin_username: Option<String>,
}

fn cleaned(items: Option<&[String]>) -> Vec<String> {
    items
        .unwrap_or_default()
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

impl AppSettings {
    /// Parse the bind address, falling back to the loopback default.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR))
    }

    pub fn fetch_allowed_hosts(&self) -> Vec<String> {
        cleaned(self.fetch_allowed_hosts.as_deref())
    }

    pub fn redirect_allowed_hosts(&self) -> Vec<String> {
        cleaned(self.redirect_allowed_hosts.as_deref())
    }

    pub fn cors_allowed_origins(&self) -> Vec<String> {
        cleaned(self.cors_allowed_origins.as_deref())
    }

    pub fn ping_program(&self) -> &str {
        self.ping_program.as_deref().unwrap_or(DEFAULT_PING_PROGRAM)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_secs.unwrap_or(DEFAULT_PING_TIMEOUT_SECS))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS))
    }

    /// Token lifetime; non-positive values fall back to the default.
    pub fn token_ttl(&self) -> TimeDelta {
        let minutes = self
            .token_ttl_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        TimeDelta::try_minutes(minutes)
            .unwrap_or_else(|| TimeDelta::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    pub fn admin_username(&self) -> &str {
        self.admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME)
    }
}
