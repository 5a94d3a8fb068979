//! `PingRunner` adapter spawning the system `ping` directly.
//!
//! The program receives the target as a single argv entry after `--`; no
//! shell is involved, so the target is never re-parsed as a command line.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::PingTarget;
use crate::domain::ports::{PingOutput, PingRunner, PingRunnerError};

/// Echo requests sent per run.
pub const PING_COUNT: &str = "4";

/// Runs `<program> -c 4 -- <target>` with a timeout.
#[derive(Debug, Clone)]
pub struct ProcessPingRunner {
    program: String,
    timeout: Duration,
}

impl ProcessPingRunner {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl PingRunner for ProcessPingRunner {
    async fn ping(&self, target: &PingTarget) -> Result<PingOutput, PingRunnerError> {
        let mut command = Command::new(&self.program);
        command
            .arg("-c")
            .arg(PING_COUNT)
            .arg("--")
            .arg(target.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        debug!(program = %self.program, %target, "spawning ping");

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| PingRunnerError::timed_out(self.timeout.as_secs()))?
            .map_err(|err| PingRunnerError::spawn(err.to_string()))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(PingOutput {
            output: text,
            success: output.status.success(),
        })
    }
}
