//! Readers for the plain (non-file) session toggles.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SecretsError};

const FLAG_VALUES: &str = "1|0|true|false|yes|no|y|n";
const SAME_SITE_VALUES: &str = "Strict|Lax|None";

/// In debug builds, log `problem` and carry on with `fallback`; in release
/// builds, `problem` is fatal.
pub(super) fn lenient<T>(mode: BuildMode, fallback: T, problem: SecretsError) -> Result<T, SecretsError> {
    if mode.is_debug() {
        warn!(problem = %problem, "using development default");
        Ok(fallback)
    } else {
        Err(problem)
    }
}

fn flag_value(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Read the boolean toggle `name`, using `debug_default` only when lenient.
pub(super) fn flag<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    debug_default: bool,
) -> Result<bool, SecretsError> {
    let Some(raw) = env.string(name) else {
        return lenient(mode, debug_default, SecretsError::MissingEnv { name });
    };
    match flag_value(&raw) {
        Some(value) => Ok(value),
        None => lenient(
            mode,
            debug_default,
            SecretsError::InvalidEnv {
                name,
                value: raw,
                expected: FLAG_VALUES,
            },
        ),
    }
}

/// Read `SESSION_SAMESITE`. `None` is only accepted for secure cookies,
/// since browsers drop insecure `SameSite=None` cookies.
pub(super) fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SecretsError> {
    let default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(raw) = env.string(SAMESITE_ENV) else {
        return lenient(mode, default, SecretsError::MissingEnv { name: SAMESITE_ENV });
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(mode, SameSite::None, SecretsError::InsecureSameSiteNone),
        _ => lenient(
            mode,
            default,
            SecretsError::InvalidEnv {
                name: SAMESITE_ENV,
                value: raw,
                expected: SAME_SITE_VALUES,
            },
        ),
    }
}
