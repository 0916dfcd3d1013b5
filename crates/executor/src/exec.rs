//! Operation dispatch
//!
//! Exhaustive match from `Operation` to pip invocations, with every
//! failure normalized into a failed `OperationResult`.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::op::{package_spec, Operation};
use crate::pip::{CommandOutput, Pip};
use crate::result::{OperationResult, UpdateFailure, UpdateReport};
use crate::{ExecutorError, Result};

/// One entry of `pip list --outdated --format=json`
#[derive(Debug, Deserialize)]
struct OutdatedPackage {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    latest_version: Option<String>,
}

/// Executes operations against the package manager
#[derive(Debug, Clone)]
pub struct Executor {
    pip: Pip,
}

impl Executor {
    pub fn new(pip: Pip) -> Self {
        Self { pip }
    }

    /// Entry point for model-issued calls. Never fails: unknown names,
    /// bad arguments, and execution errors all come back as failed
    /// results for the model to narrate.
    pub async fn execute_call(&self, name: &str, arguments: &Value) -> OperationResult {
        match Operation::parse(name, arguments) {
            Ok(op) => self.execute(&op).await,
            Err(e) => {
                warn!("rejected tool call {}: {}", name, e);
                OperationResult::failure(e)
            }
        }
    }

    /// Execute a validated operation.
    pub async fn execute(&self, op: &Operation) -> OperationResult {
        self.dispatch(op)
            .await
            .unwrap_or_else(OperationResult::failure)
    }

    async fn dispatch(&self, op: &Operation) -> Result<OperationResult> {
        match op {
            Operation::Install {
                package_name,
                version,
            } => self.install(package_name, version.as_deref()).await,
            Operation::List => self.list().await,
            Operation::Update { package_name } => match package_name {
                Some(name) => self.update_one(name).await,
                None => self.update_all().await,
            },
            Operation::Remove { package_name } => self.remove(package_name).await,
            Operation::Version { package_name } => self.version(package_name).await,
            Operation::Explain { package_name } => self.explain(package_name).await,
        }
    }

    async fn install(&self, package_name: &str, version: Option<&str>) -> Result<OperationResult> {
        let spec = package_spec(package_name, version);
        info!("installing {}", spec);

        let output = self.pip.run(&["install", &spec]).await?;
        finish(output)
    }

    async fn list(&self) -> Result<OperationResult> {
        info!("listing installed packages");

        let output = self.pip.run(&["list"]).await?;
        finish(output)
    }

    async fn update_one(&self, package_name: &str) -> Result<OperationResult> {
        info!("updating {}", package_name);

        let output = self.pip.run(&["install", "--upgrade", package_name]).await?;
        finish(output)
    }

    /// Update-all is the one multi-step operation: enumerate outdated
    /// packages from structured output, then upgrade each, collecting
    /// per-package outcomes instead of one opaque pass/fail.
    async fn update_all(&self) -> Result<OperationResult> {
        info!("updating all outdated packages");

        let output = self
            .pip
            .run(&["list", "--outdated", "--format=json"])
            .await?;
        if !output.success() {
            return Err(ExecutorError::Failed(trimmed_stderr(&output)));
        }

        let outdated: Vec<OutdatedPackage> = serde_json::from_str(output.stdout.trim())
            .map_err(|e| ExecutorError::Malformed(e.to_string()))?;

        let mut report = UpdateReport::default();
        for package in outdated {
            info!(
                "upgrading {} {} -> {}",
                package.name,
                package.version.as_deref().unwrap_or("?"),
                package.latest_version.as_deref().unwrap_or("?")
            );

            match self
                .pip
                .run(&["install", "--upgrade", &package.name])
                .await
            {
                Ok(output) if output.success() => report.upgraded.push(package.name),
                Ok(output) => report.failed.push(UpdateFailure {
                    name: package.name,
                    error: trimmed_stderr(&output),
                }),
                Err(e) => report.failed.push(UpdateFailure {
                    name: package.name,
                    error: e.to_string(),
                }),
            }
        }

        Ok(OperationResult::updates(report))
    }

    async fn remove(&self, package_name: &str) -> Result<OperationResult> {
        info!("removing {}", package_name);

        let output = self.pip.run(&["uninstall", package_name, "-y"]).await?;
        finish(output)
    }

    async fn version(&self, package_name: &str) -> Result<OperationResult> {
        let output = self.pip.run(&["show", package_name]).await?;
        if !output.success() {
            return Err(ExecutorError::NotFound(package_name.to_string()));
        }

        match parse_version(&output.stdout) {
            Some(version) => Ok(OperationResult::version(version)),
            None => Err(ExecutorError::NotFound(package_name.to_string())),
        }
    }

    async fn explain(&self, package_name: &str) -> Result<OperationResult> {
        let output = self.pip.run(&["show", package_name]).await?;
        if !output.success() {
            return Err(ExecutorError::NotFound(package_name.to_string()));
        }

        Ok(OperationResult::output(output.stdout))
    }
}

/// Classify a completed invocation: exit 0 yields stdout as payload,
/// anything else is an operation failure carrying stderr.
fn finish(output: CommandOutput) -> Result<OperationResult> {
    if output.success() {
        Ok(OperationResult::output(output.stdout))
    } else {
        Err(ExecutorError::Failed(trimmed_stderr(&output)))
    }
}

fn trimmed_stderr(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        format!("exit code {}", output.code.unwrap_or(-1))
    } else {
        stderr.to_string()
    }
}

/// Extract the version token from `pip show` output.
fn parse_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Version:"))
        .map(|rest| rest.trim().to_string())
        .filter(|v| !v.is_empty())
}
