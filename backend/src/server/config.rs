//! Listener and cookie settings handed to `create_server`.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use crate::config::SessionSettings;

/// Everything the listener needs beyond the prepared services.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Start from validated session settings; CORS allows no origins until
    /// [`ServerConfig::with_cors_origins`] is called.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            cors_origins: Vec::new(),
        }
    }

    /// Allow cross-origin requests from exactly these origins.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}
