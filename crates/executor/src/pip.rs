//! pip subprocess runner
//!
//! Spawns the configured binary with an argument vector and fully buffered
//! stdio. There is deliberately no shell anywhere in this path.

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::{ExecutorError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Captured output of one pip invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Handle to the package-manager binary
#[derive(Debug, Clone)]
pub struct Pip {
    binary: String,
    timeout_secs: u64,
}

impl Pip {
    pub fn new(binary: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            binary: binary.into(),
            timeout_secs,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run one invocation. Spawn failures and timeouts are errors; a
    /// nonzero exit is a normal `CommandOutput` classified by the caller.
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        debug!("running {} {}", self.binary, args.join(" "));

        let mut cmd = Command::new(&self.binary);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

        let output = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            cmd.output(),
        )
        .await
        .map_err(|_| ExecutorError::Timeout(self.timeout_secs))?
        .map_err(|source| ExecutorError::Environment {
            binary: self.binary.clone(),
            source,
        })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        })
    }
}

impl Default for Pip {
    fn default() -> Self {
        Self::new("pip", DEFAULT_TIMEOUT_SECS)
    }
}
