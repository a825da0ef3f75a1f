//! External command execution
//!
//! - [`traits`] - [`CommandRunner`] seam and [`CommandResult`]
//! - [`runner`] - Child-process implementation
//! - [`dry_run`] - Logging-only implementation for `--dry-run`

pub mod dry_run;
pub mod runner;
pub mod traits;

pub use dry_run::DryRunRunner;
pub use runner::ProcessRunner;
pub use traits::{CommandResult, CommandRunner};
