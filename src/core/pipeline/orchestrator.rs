//! Pipeline orchestrator - sequences one transfer run
//!
//! Each transition calls one component; the first error ends the run. There
//! is no rollback: a written credential file is cleaned up by its guard, but
//! a started export or a partial sync is left as-is.

use crate::adapters::process::CommandRunner;
use crate::adapters::secrets::SecretStore;
use crate::config::TransferConfig;
use crate::core::context::ExecutionContext;
use crate::core::credentials;
use crate::core::date::resolve_partition_key;
use crate::core::pipeline::commands::{self, ToolCommand};
use crate::core::pipeline::stage::{PipelineFailure, PipelineReport, PipelineStage};
use crate::core::pipeline::targets::TransferTargets;
use crate::domain::{PartitionKey, TransferError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Pipeline orchestrator
pub struct PipelineOrchestrator {
    config: TransferConfig,
    context: ExecutionContext,
    secret_store: Arc<dyn SecretStore>,
    runner: Arc<dyn CommandRunner>,
    dry_run: bool,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator
    pub fn new(
        config: TransferConfig,
        context: ExecutionContext,
        secret_store: Arc<dyn SecretStore>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            context,
            secret_store,
            runner,
            dry_run: false,
        }
    }

    /// Mark runs as dry runs in their reports
    ///
    /// The caller supplies the runner; this flag only labels the outcome.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute one run
    ///
    /// `target_date` is the operator-supplied `YYYY-MM-DD` date, if any; `now`
    /// drives the default partition.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineFailure`] naming the stage that could not be reached.
    pub async fn run(
        &self,
        target_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> std::result::Result<PipelineReport, PipelineFailure> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "transfer",
            run_id = %run_id,
            partition = tracing::field::Empty
        );

        self.execute(run_id, target_date, now)
            .instrument(span)
            .await
    }

    async fn execute(
        &self,
        run_id: Uuid,
        target_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> std::result::Result<PipelineReport, PipelineFailure> {
        let start_time = Instant::now();
        let mut progress = Progress::new(run_id);

        tracing::info!(dry_run = self.dry_run, "Starting transfer run");

        // START -> DATE_RESOLVED
        let partition = resolve_partition_key(target_date, now).map_err(|e| progress.fail(e))?;
        tracing::Span::current().record("partition", tracing::field::display(&partition));
        progress.partition = Some(partition.clone());
        progress.advance(PipelineStage::DateResolved);

        // DATE_RESOLVED -> SECRET_RESOLVED
        let bundle = self
            .secret_store
            .resolve(&self.config.aws.secret_name)
            .await
            .map_err(|e| progress.fail(e))?;
        let targets = TransferTargets::from_bundle(&bundle, &self.config.secret_keys)
            .map_err(|e| progress.fail(e))?;
        progress.advance(PipelineStage::SecretResolved);

        // SECRET_RESOLVED -> CREDENTIALS_WRITTEN
        let credential_file = credentials::materialize(
            &bundle,
            &targets.credentials_key,
            &self.config.gcp.credentials_path,
        )
        .map_err(|e| progress.fail(e))?
        .keep_on_drop(self.config.gcp.keep_credentials);
        drop(bundle);
        progress.advance(PipelineStage::CredentialsWritten);

        // CREDENTIALS_WRITTEN -> PROJECT_INITIALIZED
        tracing::info!(project_id = %targets.dataset.project_id(), "Setting warehouse project");
        self.invoke(&progress, commands::set_project(&targets.dataset))
            .await?;
        progress.advance(PipelineStage::ProjectInitialized);

        // PROJECT_INITIALIZED -> AUTHENTICATED
        self.invoke(
            &progress,
            commands::activate_service_account(credential_file.path()),
        )
        .await?;
        progress.advance(PipelineStage::Authenticated);

        // AUTHENTICATED -> EXPORTED
        tracing::info!(
            table = %format!("{}.events_{}", targets.dataset.dotted(), partition),
            destination = %commands::export_destination(&targets.staging_root, &partition),
            "Exporting partition to staging"
        );
        self.invoke(
            &progress,
            commands::extract_partition(
                &self.config.gcp.region,
                &targets.dataset,
                &partition,
                &targets.staging_root,
            ),
        )
        .await?;
        progress.advance(PipelineStage::Exported);

        // EXPORTED -> SYNCED
        tracing::info!(
            source = %targets.staging_root,
            destination = %targets.durable_root,
            "Mirroring staging to durable storage"
        );
        self.invoke(
            &progress,
            commands::sync_to_durable(&targets.staging_root, &targets.durable_root),
        )
        .await?;
        progress.advance(PipelineStage::Synced);

        // SYNCED -> DONE
        drop(credential_file);
        progress.advance(PipelineStage::Done);

        let duration = start_time.elapsed();
        tracing::info!(
            partition = %partition,
            duration_ms = duration.as_millis() as u64,
            "Data successfully transferred for date: {}",
            partition
        );

        Ok(PipelineReport {
            run_id,
            partition,
            stages: progress.completed,
            dry_run: self.dry_run,
            duration,
        })
    }

    async fn invoke(
        &self,
        progress: &Progress,
        command: ToolCommand,
    ) -> std::result::Result<(), PipelineFailure> {
        let result = self
            .runner
            .run_checked(&command, &self.context)
            .await
            .map_err(|e| progress.fail(e))?;

        tracing::info!(
            command = %command,
            stdout = %result.stdout.trim_end(),
            "Command output"
        );
        Ok(())
    }
}

/// Stages reached so far in one run
struct Progress {
    run_id: Uuid,
    completed: Vec<PipelineStage>,
    partition: Option<PartitionKey>,
}

impl Progress {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            completed: vec![PipelineStage::Start],
            partition: None,
        }
    }

    fn last(&self) -> PipelineStage {
        self.completed
            .last()
            .copied()
            .unwrap_or(PipelineStage::Start)
    }

    fn advance(&mut self, stage: PipelineStage) {
        debug_assert_eq!(self.last().next(), Some(stage));
        crate::log_stage_reached!(stage);
        self.completed.push(stage);
    }

    /// Logs the error with its full context and builds the terminal failure
    fn fail(&self, error: TransferError) -> PipelineFailure {
        let last_completed = self.last();
        let failed_stage = last_completed.next().unwrap_or(PipelineStage::Done);

        if let TransferError::ExternalCommandFailed {
            command,
            exit_status,
            stdout,
            stderr,
        } = &error
        {
            crate::log_command_failure!(command, exit_status, stdout, stderr);
        }

        tracing::error!(
            failed_stage = %failed_stage,
            last_completed = %last_completed,
            error = %error,
            "Transfer run failed"
        );

        PipelineFailure {
            run_id: self.run_id,
            failed_stage,
            last_completed,
            partition: self.partition.clone(),
            error,
        }
    }
}
