//! Runtime configuration.
//!
//! Non-secret settings are layered by OrthoConfig (CLI, `BASTION_*`
//! environment, config file); secrets come from files named by environment
//! variables and are validated against the build mode.

pub mod secrets;
mod settings;

pub use secrets::{BuildMode, Secrets, SecretsError, SessionSettings, secrets_from_env};
pub use settings::AppSettings;
