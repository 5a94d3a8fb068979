//! Secret material and cookie toggles read from the environment.
//!
//! Keys are read from files whose paths are named by environment variables.
//! Debug builds tolerate missing toggles and fall back to ephemeral keys with
//! a warning; release builds require every toggle and key explicitly.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use rand::RngCore;
use tracing::{info, warn};
use zeroize::{Zeroize, Zeroizing};

pub mod fingerprint;
mod parsing;

use parsing::{flag, lenient, same_site};

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum session key length accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// Minimum token secret length accepted in release builds.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub const SAMESITE_ENV: &str = "SESSION_SAMESITE";
pub const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
pub const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
pub const TOKEN_SECRET_FILE_ENV: &str = "TOKEN_SECRET_FILE";
pub const ADMIN_PASSWORD_FILE_ENV: &str = "ADMIN_PASSWORD_FILE";

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid toggles and keys.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bastion::config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub(crate) fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session cookie settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Everything secret the service needs at startup.
pub struct Secrets {
    pub session: SessionSettings,
    /// HMAC secret for bearer tokens.
    pub token_secret: Zeroizing<Vec<u8>>,
    /// Password for the bootstrapped administrator, when configured.
    pub admin_password: Option<Zeroizing<String>>,
}

/// Errors raised while loading secrets.
#[derive(thiserror::Error, Debug)]
pub enum SecretsError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading a secret file failed.
    #[error("failed to read {name} at {path}: {source}")]
    SecretRead {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file exists but is too short for release builds.
    #[error("{name} at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        name: &'static str,
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// The admin password file is empty once trailing newlines are removed.
    #[error("admin password file at {path} is empty")]
    EmptyAdminPassword { path: PathBuf },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Load session settings, the token secret and the optional admin password.
///
/// # Examples
///
/// ```rust
/// use bastion::config::{BuildMode, secrets_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = std::env::temp_dir();
/// let session_key = dir.join("bastion_session_key_example");
/// let token_secret = dir.join("bastion_token_secret_example");
/// std::fs::write(&session_key, vec![b'a'; 64])?;
/// std::fs::write(&token_secret, vec![b'b'; 32])?;
///
/// let session_key_path = session_key.to_string_lossy().into_owned();
/// let token_secret_path = token_secret.to_string_lossy().into_owned();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "SESSION_KEY_FILE" => Some(session_key_path.clone()),
///     "TOKEN_SECRET_FILE" => Some(token_secret_path.clone()),
///     "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
///     "SESSION_SAMESITE" => Some("Strict".to_owned()),
///     "SESSION_ALLOW_EPHEMERAL" => Some("0".to_owned()),
///     _ => None,
/// });
///
/// let secrets = secrets_from_env(&env, BuildMode::Release)?;
/// assert!(secrets.session.cookie_secure);
/// assert!(secrets.admin_password.is_none());
///
/// std::fs::remove_file(&session_key)?;
/// std::fs::remove_file(&token_secret)?;
/// # Ok(())
/// # }
/// ```
pub fn secrets_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Secrets, SecretsError> {
    let session = session_settings_from_env(env, mode)?;
    let token_secret = token_secret_from_env(env, mode)?;
    let admin_password = admin_password_from_env(env)?;
    info!(
        session_key = %fingerprint::key_fingerprint(&session.key),
        token_secret = %fingerprint::bytes_fingerprint(&token_secret),
        "secrets loaded"
    );
    Ok(Secrets {
        session,
        token_secret,
        admin_password,
    })
}

/// Build session settings from environment variables and build mode.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SecretsError> {
    let cookie_secure = flag(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = flag(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SecretsError::EphemeralNotAllowed);
    }
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn read_secret_file<E: Env>(
    env: &E,
    name: &'static str,
) -> Option<(PathBuf, std::io::Result<Vec<u8>>)> {
    let path = PathBuf::from(env.string(name)?);
    let bytes = std::fs::read(&path);
    Some((path, bytes))
}

fn ensure_min_len(
    name: &'static str,
    path: PathBuf,
    bytes: &mut Vec<u8>,
    min_len: usize,
    mode: BuildMode,
) -> Result<(), SecretsError> {
    let length = bytes.len();
    if mode == BuildMode::Release && length < min_len {
        bytes.zeroize();
        return Err(SecretsError::SecretTooShort {
            name,
            path,
            length,
            min_len,
        });
    }
    Ok(())
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SecretsError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            ensure_min_len(KEY_FILE_ENV, path, &mut bytes, SESSION_KEY_MIN_LEN, mode)?;
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SecretsError::SecretRead {
            name: KEY_FILE_ENV,
            path,
            source: error,
        }),
    }
}

fn ephemeral_token_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0_u8; TOKEN_SECRET_MIN_LEN]);
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, SecretsError> {
    let Some((path, read)) = read_secret_file(env, TOKEN_SECRET_FILE_ENV) else {
        return lenient(
            mode,
            ephemeral_token_secret(),
            SecretsError::MissingEnv {
                name: TOKEN_SECRET_FILE_ENV,
            },
        );
    };

    match read {
        Ok(mut bytes) => {
            ensure_min_len(
                TOKEN_SECRET_FILE_ENV,
                path,
                &mut bytes,
                TOKEN_SECRET_MIN_LEN,
                mode,
            )?;
            Ok(Zeroizing::new(bytes))
        }
        Err(error) if mode.is_debug() => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary token secret (dev only)"
            );
            Ok(ephemeral_token_secret())
        }
        Err(error) => Err(SecretsError::SecretRead {
            name: TOKEN_SECRET_FILE_ENV,
            path,
            source: error,
        }),
    }
}

fn admin_password_from_env<E: Env>(env: &E) -> Result<Option<Zeroizing<String>>, SecretsError> {
    let Some((path, read)) = read_secret_file(env, ADMIN_PASSWORD_FILE_ENV) else {
        warn!("ADMIN_PASSWORD_FILE not set; no administrator account will be created");
        return Ok(None);
    };
    let bytes = Zeroizing::new(read.map_err(|source| SecretsError::SecretRead {
        name: ADMIN_PASSWORD_FILE_ENV,
        path: path.clone(),
        source,
    })?);
    let text = String::from_utf8_lossy(&bytes);
    let trimmed = text.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        return Err(SecretsError::EmptyAdminPassword { path });
    }
    Ok(Some(Zeroizing::new(trimmed.to_owned())))
}
