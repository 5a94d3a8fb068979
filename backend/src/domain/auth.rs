//! Authentication primitives: login credentials, passwords and registration
//! requests.
//!
//! Handlers build these from raw strings; services only ever see values that
//! passed the constructors here.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, Role, USERNAME_MAX, UserValidationError, Username};

/// Why a login payload was refused before any lookup happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    /// No stored account can match a longer name.
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("password must not be empty")]
    EmptyPassword,
    /// Refused up front so oversized inputs never reach the hasher.
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

/// Username and password as submitted to `POST /login`.
///
/// The username is trimmed and capped at [`USERNAME_MAX`] characters but not
/// otherwise checked against the account naming rules, so a malformed name
/// fails the same way an unknown one does. The
/// password keeps its whitespace and lives in zeroizing memory.
///
/// # Examples
/// ```
/// use bastion::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "hunter2").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert!(LoginCredentials::try_from_parts("admin", "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Password,
}

impl LoginCredentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(LoginValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let password = Password::for_hashing(password).map_err(|err| match err {
            CredentialValidationError::PasswordTooLong { max } => {
                LoginValidationError::PasswordTooLong { max }
            }
            _ => LoginValidationError::EmptyPassword,
        })?;
        Ok(Self {
            username: username.to_owned(),
            password,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose()
    }
}

/// Minimum length for an account password.
pub const PASSWORD_MIN: usize = 8;
/// Maximum length for any password the service will hash.
pub const PASSWORD_MAX: usize = 128;

/// Errors raised while validating passwords and registrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Plain-text password held in zeroizing memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Password for a new account: `PASSWORD_MIN..=PASSWORD_MAX` characters.
    pub fn for_account(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if raw.chars().count() < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Self::for_hashing(raw)
    }

    /// Any non-empty password up to `PASSWORD_MAX` characters.
    pub fn for_hashing(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if raw.chars().count() > PASSWORD_MAX {
            return Err(CredentialValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated self-service registration request.
///
/// `requested_role` is only honoured when an administrator makes the call;
/// the accounts service decides that, not this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: Email,
    password: Password,
    requested_role: Option<Role>,
}

impl Registration {
    /// Validate raw registration fields.
    ///
    /// # Examples
    /// ```
    /// use bastion::domain::{Registration, Role};
    ///
    /// let reg = Registration::try_from_parts("bob", "bob@example.com", "hunter22!", Some("admin"))
    ///     .unwrap();
    /// assert_eq!(reg.requested_role(), Some(Role::Admin));
    /// ```
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        requested_role: Option<&str>,
    ) -> Result<Self, CredentialValidationError> {
        let username = Username::new(username.trim())?;
        let email = Email::new(email)?;
        let password = Password::for_account(password)?;
        let requested_role = requested_role.map(str::parse::<Role>).transpose()?;
        Ok(Self {
            username,
            email,
            password,
            requested_role,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn requested_role(&self) -> Option<Role> {
        self.requested_role
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case(" \t ", "pw", LoginValidationError::EmptyUsername)]
    #[case(&"c".repeat(USERNAME_MAX + 1), "pw", LoginValidationError::UsernameTooLong { max: USERNAME_MAX })]
    #[case("carol", "", LoginValidationError::EmptyPassword)]
    #[case("carol", &"p".repeat(PASSWORD_MAX + 1), LoginValidationError::PasswordTooLong { max: PASSWORD_MAX })]
    fn login_payloads_refused_before_lookup(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        assert_eq!(
            LoginCredentials::try_from_parts(username, password),
            Err(expected)
        );
    }

    #[rstest]
    #[case(" carol ", " spaced pw ", "carol")]
    #[case("admin' --", "x", "admin' --")]
    #[case(&format!(" {} ", "c".repeat(USERNAME_MAX)), "x", &"c".repeat(USERNAME_MAX))]
    fn login_payloads_keep_password_verbatim(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected_username: &str,
    ) {
        let creds = LoginCredentials::try_from_parts(username, password).expect("accepted");
        assert_eq!(creds.username(), expected_username);
        assert_eq!(creds.password(), password);
        assert!(!format!("{creds:?}").contains(password.trim()));
    }

    #[rstest]
    #[case("", CredentialValidationError::EmptyPassword)]
    #[case("short", CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case(&"x".repeat(PASSWORD_MAX + 1), CredentialValidationError::PasswordTooLong { max: PASSWORD_MAX })]
    fn account_password_policy(#[case] raw: &str, #[case] expected: CredentialValidationError) {
        let err = Password::for_account(raw).expect_err("policy violation");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn hashing_password_allows_short_values() {
        let password = Password::for_hashing("pw").expect("non-empty");
        assert_eq!(password.expose(), "pw");
        assert_eq!(format!("{password:?}"), "Password(<redacted>)");
    }

    #[rstest]
    fn registration_rejects_unknown_role() {
        let err = Registration::try_from_parts("bob", "bob@example.com", "long enough", Some("root"))
            .expect_err("unknown role");
        assert_eq!(
            err,
            CredentialValidationError::User(UserValidationError::UnknownRole)
        );
    }

    #[rstest]
    fn registration_without_role_defaults_to_none() {
        let reg = Registration::try_from_parts(" bob ", "bob@example.com", "long enough", None)
            .expect("valid registration");
        assert_eq!(reg.username().as_ref(), "bob");
        assert_eq!(reg.requested_role(), None);
    }
}
