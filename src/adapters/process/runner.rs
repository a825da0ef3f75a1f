//! Process-backed command runner

use super::traits::{CommandResult, CommandRunner};
use crate::core::context::ExecutionContext;
use crate::core::pipeline::commands::ToolCommand;
use crate::domain::{Result, TransferError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Runs tools as child processes
///
/// The child sees exactly the variables in the [`ExecutionContext`]; the
/// runner's own environment is not inherited. There is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &ToolCommand,
        context: &ExecutionContext,
    ) -> Result<CommandResult> {
        tracing::debug!(command = %command, "Executing external command");

        let output = Command::new(command.program())
            .args(command.args())
            .env_clear()
            .envs(context.vars())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TransferError::CommandLaunch {
                program: command.program().to_string(),
                message: e.to_string(),
            })?;

        let result = CommandResult {
            exit_status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(
            command = %command,
            exit_status = ?result.exit_status,
            "External command finished"
        );

        Ok(result)
    }
}
