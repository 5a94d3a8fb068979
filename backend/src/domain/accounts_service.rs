//! Account use-cases: login, registration and user queries.
//!
//! Implements [`LoginService`], [`RegistrationCommand`] and [`UsersQuery`]
//! over the user repository, the password hasher and the token issuer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    LoginOutcome, LoginService, PasswordHashError, PasswordHasher, RegistrationCommand,
    TokenError, TokenIssuer, UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{
    Email, Error, ErrorCode, LoginCredentials, LoginThrottle, NewUser, Password, Registration,
    Role, User, UserId, Username,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing the account driving ports.
pub struct AccountService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenIssuer>,
    throttle: Arc<LoginThrottle>,
}

impl<R, H> AccountService<R, H> {
    /// Create a new service from its collaborators.
    pub fn new(
        users: Arc<R>,
        hasher: Arc<H>,
        tokens: Arc<dyn TokenIssuer>,
        throttle: Arc<LoginThrottle>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            throttle,
        }
    }
}

impl<R, H> AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::DuplicateUsername => Error::conflict("username already exists"),
            other => Error::internal(format!("user repository error: {other}")),
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(format!("password hashing error: {error}"))
    }

    fn map_token_error(error: TokenError) -> Error {
        Error::internal(format!("token issuing error: {error}"))
    }

    /// Create the administrator account unless the username already exists.
    ///
    /// Returns `true` when an account was created.
    pub async fn bootstrap_admin(
        &self,
        username: Username,
        email: Email,
        password: &Password,
    ) -> Result<bool, Error> {
        let existing = self
            .users
            .find_credentials(username.as_ref())
            .await
            .map_err(Self::map_user_error)?;
        if existing.is_some() {
            return Ok(false);
        }
        let password_hash = self
            .hasher
            .hash(password)
            .await
            .map_err(Self::map_hash_error)?;
        let new_user = NewUser {
            username,
            email,
            role: Role::Admin,
            password_hash,
        };
        self.users
            .insert(&new_user)
            .await
            .map_err(Self::map_user_error)?;
        info!(username = %new_user.username, "administrator account bootstrapped");
        Ok(true)
    }

    async fn verify_credentials(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(Self::map_user_error)?;
        let Some(stored) = stored else {
            self.hasher.verify_dummy(credentials.password()).await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let valid = self
            .hasher
            .verify(credentials.password(), stored.password_hash())
            .await
            .map_err(Self::map_hash_error)?;
        if valid {
            Ok(stored.into_user())
        } else {
            Err(Error::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

#[async_trait]
impl<R, H> LoginService for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let username = credentials.username();
        let Some(attempt) = self.throttle.begin(username) else {
            warn!(username, "login throttled");
            return Err(Error::too_many_requests(
                "too many failed login attempts; try again later",
            ));
        };
        match self.verify_credentials(credentials).await {
            Ok(user) => {
                attempt.succeeded();
                let token = self.tokens.issue(&user).map_err(Self::map_token_error)?;
                info!(user_id = %user.id(), "login succeeded");
                Ok(LoginOutcome { user, token })
            }
            Err(error) => {
                if error.code() == ErrorCode::Unauthorized {
                    attempt.failed();
                    warn!(username, "login failed");
                }
                Err(error)
            }
        }
    }
}

#[async_trait]
impl<R, H> RegistrationCommand for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register(
        &self,
        registration: &Registration,
        caller_role: Option<Role>,
    ) -> Result<UserId, Error> {
        let caller_is_admin = caller_role.is_some_and(Role::is_admin);
        let role = match registration.requested_role() {
            Some(requested) if caller_is_admin => requested,
            Some(Role::Admin) => {
                warn!(
                    username = %registration.username(),
                    "elevated role requested without admin caller; ignoring"
                );
                Role::User
            }
            _ => Role::User,
        };
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(Self::map_hash_error)?;
        let new_user = NewUser {
            username: registration.username().clone(),
            email: registration.email().clone(),
            role,
            password_hash,
        };
        let id = self
            .users
            .insert(&new_user)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %id, role = %role, "account registered");
        Ok(id)
    }
}

#[async_trait]
impl<R, H> UsersQuery for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(Self::map_user_error)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(Self::map_user_error)
    }
}

#[cfg(test)]
#[path = "accounts_service_tests.rs"]
mod tests;
