//! Port for signed bearer tokens.
use chrono::{DateTime, Utc};

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Signing failed.
        Signing { message: String } => "token signing failed: {message}",
        /// The token is malformed, badly signed or expired.
        Invalid => "token is invalid or expired",
    }
}

/// Freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity asserted by a verified token.
///
/// Only the subject is trusted for authorisation; roles are re-read from
/// storage on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: UserId,
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `user`.
    fn issue(&self, user: &User) -> Result<IssuedToken, TokenError>;

    /// Verify signature and expiry, returning the subject.
    fn verify(&self, token: &str) -> Result<TokenSubject, TokenError>;
}
