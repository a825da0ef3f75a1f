//! Pipeline stages and the run outcome types
//!
//! The pipeline is a strictly linear state machine:
//!
//! `Start → DateResolved → SecretResolved → CredentialsWritten →
//! ProjectInitialized → Authenticated → Exported → Synced → Done`
//!
//! Any failed transition ends the run in a [`PipelineFailure`] naming the
//! stage that could not be reached.

use crate::domain::{PartitionKey, TransferError};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// State of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineStage {
    Start,
    DateResolved,
    SecretResolved,
    CredentialsWritten,
    ProjectInitialized,
    Authenticated,
    Exported,
    Synced,
    Done,
}

impl PipelineStage {
    /// All stages in transition order
    pub const ALL: [PipelineStage; 9] = [
        PipelineStage::Start,
        PipelineStage::DateResolved,
        PipelineStage::SecretResolved,
        PipelineStage::CredentialsWritten,
        PipelineStage::ProjectInitialized,
        PipelineStage::Authenticated,
        PipelineStage::Exported,
        PipelineStage::Synced,
        PipelineStage::Done,
    ];

    /// The only successor of this stage, `None` for `Done`
    pub fn next(self) -> Option<PipelineStage> {
        let index = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(index + 1).copied()
    }

    /// Stable snake_case name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Start => "start",
            PipelineStage::DateResolved => "date_resolved",
            PipelineStage::SecretResolved => "secret_resolved",
            PipelineStage::CredentialsWritten => "credentials_written",
            PipelineStage::ProjectInitialized => "project_initialized",
            PipelineStage::Authenticated => "authenticated",
            PipelineStage::Exported => "exported",
            PipelineStage::Synced => "synced",
            PipelineStage::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Identifier attached to every log line of the run
    pub run_id: Uuid,

    /// Exported partition
    pub partition: PartitionKey,

    /// Stages reached, in order, ending with `Done`
    pub stages: Vec<PipelineStage>,

    /// Tool invocations were logged instead of executed
    pub dry_run: bool,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl PipelineReport {
    /// Final stage reached
    pub fn final_stage(&self) -> PipelineStage {
        self.stages.last().copied().unwrap_or(PipelineStage::Start)
    }
}

/// Terminal failure of a run
#[derive(Debug, thiserror::Error)]
#[error("Pipeline failed before reaching '{failed_stage}': {error}")]
pub struct PipelineFailure {
    /// Identifier attached to every log line of the run
    pub run_id: Uuid,

    /// Stage whose transition failed
    pub failed_stage: PipelineStage,

    /// Last stage reached successfully
    pub last_completed: PipelineStage,

    /// Partition, if the date had been resolved
    pub partition: Option<PartitionKey>,

    /// Underlying error
    #[source]
    pub error: TransferError,
}

impl PipelineFailure {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}
