//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::RedirectPolicy;
use crate::domain::ports::{
    CatalogueQuery, CommentsCommand, CommentsQuery, FetchCommand, FileStore, LoginService,
    PasswordHasher, PingCommand, RegistrationCommand, TokenIssuer, UsersQuery,
};

use super::diagnostics::RuntimeInfo;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
    pub ping: Arc<dyn PingCommand>,
    pub fetch: Arc<dyn FetchCommand>,
    pub files: Arc<dyn FileStore>,
    pub hasher: Arc<dyn PasswordHasher>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
    pub ping: Arc<dyn PingCommand>,
    pub fetch: Arc<dyn FetchCommand>,
    pub files: Arc<dyn FileStore>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub redirects: RedirectPolicy,
    pub runtime: RuntimeInfo,
}

impl HttpState {
    /// Construct state from the ports bundle and the redirect allow-list.
    ///
    /// The process start time for `/debug` is captured here.
    pub fn new(ports: HttpStatePorts, redirects: RedirectPolicy) -> Self {
        let HttpStatePorts {
            login,
            users,
            registration,
            tokens,
            catalogue,
            comments,
            comments_query,
            ping,
            fetch,
            files,
            hasher,
        } = ports;
        Self {
            login,
            users,
            registration,
            tokens,
            catalogue,
            comments,
            comments_query,
            ping,
            fetch,
            files,
            hasher,
            redirects,
            runtime: RuntimeInfo::start(),
        }
    }
}
