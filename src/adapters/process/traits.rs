//! Command runner abstraction
//!
//! Every pipeline step that talks to an external tool goes through
//! [`CommandRunner`], which makes the whole pipeline testable with a fake
//! runner.

use crate::core::context::ExecutionContext;
use crate::core::pipeline::commands::ToolCommand;
use crate::domain::{Result, TransferError};
use async_trait::async_trait;

/// Captured outcome of one external invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code, `None` if the process was terminated by a signal
    pub exit_status: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,
}

impl CommandResult {
    /// A zero-exit result with the given stdout
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Returns true if the command exited with status 0
    pub fn is_success(&self) -> bool {
        self.exit_status == Some(0)
    }
}

/// Runner for external tool commands
///
/// Implementations capture both output streams in full and never write to the
/// terminal; callers decide what to log.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs a command to completion
    ///
    /// A non-zero exit is not an error here; see [`CommandRunner::run_checked`].
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::CommandLaunch`] if the process cannot be started.
    async fn run(&self, command: &ToolCommand, context: &ExecutionContext)
        -> Result<CommandResult>;

    /// Runs a command and fails on a non-zero exit
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::ExternalCommandFailed`] carrying both captured
    /// streams if the command exits with anything other than 0.
    async fn run_checked(
        &self,
        command: &ToolCommand,
        context: &ExecutionContext,
    ) -> Result<CommandResult> {
        let result = self.run(command, context).await?;
        if result.is_success() {
            return Ok(result);
        }

        Err(TransferError::ExternalCommandFailed {
            command: command.to_string(),
            exit_status: result.exit_status,
            stdout: result.stdout,
            stderr: result.stderr,
        })
    }
}
