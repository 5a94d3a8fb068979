//! Port for password hashing and verification.
//!
//! Implementations produce self-describing PHC strings with a fresh random
//! salt per hash.
use async_trait::async_trait;

use crate::domain::Password;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` into a PHC string.
    async fn hash(&self, password: &Password) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored PHC string.
    async fn verify(&self, password: &str, phc: &str) -> Result<bool, PasswordHashError>;

    /// Spend the same effort as [`PasswordHasher::verify`] without a stored
    /// hash, so unknown usernames cost as much as wrong passwords.
    async fn verify_dummy(&self, password: &str);
}
