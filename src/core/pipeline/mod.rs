//! Transfer pipeline
//!
//! - [`orchestrator`] - [`PipelineOrchestrator`] sequencing one run
//! - [`stage`] - Stage state machine, run report and failure types
//! - [`targets`] - Typed lookup of the secret bundle keys
//! - [`commands`] - Argument-vector builders for the external tools

pub mod commands;
pub mod orchestrator;
pub mod stage;
pub mod targets;

pub use orchestrator::PipelineOrchestrator;
pub use stage::{PipelineFailure, PipelineReport, PipelineStage};
pub use targets::TransferTargets;
