//! Driving port for account creation.

use async_trait::async_trait;

use crate::domain::{Error, Registration, Role, UserId};

/// Domain use-case port for registering accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Create an account. `caller_role` is the current role of the
    /// authenticated caller, if any; only an administrator may choose a role.
    async fn register(
        &self,
        registration: &Registration,
        caller_role: Option<Role>,
    ) -> Result<UserId, Error>;
}
