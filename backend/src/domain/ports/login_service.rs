//! Password login, as called by the `/login` handler.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

use super::IssuedToken;

/// Successful login: the public user plus a signed bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub token: IssuedToken,
}

/// Checks credentials against stored accounts and issues a bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Unknown users and wrong passwords fail identically with
    /// `unauthorized`; throttled usernames fail with `too_many_requests`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;
}
