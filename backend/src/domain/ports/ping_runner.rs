//! Port for running the system ping utility.
use async_trait::async_trait;

use crate::domain::PingTarget;

use super::define_port_error;

define_port_error! {
    /// Errors raised by ping runners.
    pub enum PingRunnerError {
        /// The process could not be started.
        Spawn { message: String } => "failed to start ping: {message}",
        /// The process did not finish in time and was killed.
        TimedOut { seconds: u64 } => "ping timed out after {seconds}s",
    }
}

/// Captured result of one ping run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingOutput {
    /// Combined stdout and stderr, lossily decoded.
    pub output: String,
    /// Whether the process exited successfully.
    pub success: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PingRunner: Send + Sync {
    /// Ping `target` without involving a shell.
    async fn ping(&self, target: &PingTarget) -> Result<PingOutput, PingRunnerError>;
}
