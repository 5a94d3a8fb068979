//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, StoredCredentials, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already taken.
        DuplicateUsername => "username already exists",
    }
}

/// Storage for accounts. Every lookup binds its inputs as parameters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account and return its identifier.
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError>;

    /// Fetch the account and password hash for a login attempt.
    ///
    /// `username` is raw caller input and may not be a valid [`crate::domain::Username`].
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// All users ordered by identifier.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
