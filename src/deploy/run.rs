// ABOUTME: Top-level deploy run: sequences the release phases and reports progress.
// ABOUTME: Owns the scratch directory so it is removed on every exit path.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::config::DeploySpec;
use crate::diagnostics::{Diagnostics, Warning};
use crate::kubectl::CommandRunner;
use crate::output::Output;
use crate::render::ScratchDir;

use super::gate::DiffReport;
use super::readiness::ReadinessWaiter;
use super::release::Release;
use super::{DeployError, RunOutcome};

/// Per-invocation settings that are not part of the deploy spec.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory manifest paths are resolved against.
    pub base_dir: PathBuf,
    /// Stop after validation even when the deploy config has `dryrun: false`.
    pub validate_only: bool,
}

/// Drives one deploy run through its phases.
pub struct Orchestrator<'a, R: ?Sized> {
    spec: &'a DeploySpec,
    runner: &'a R,
    cancel: CancellationToken,
    output: &'a Output,
}

impl<'a, R: CommandRunner + ?Sized> Orchestrator<'a, R> {
    pub fn new(
        spec: &'a DeploySpec,
        runner: &'a R,
        cancel: CancellationToken,
        output: &'a Output,
    ) -> Self {
        Self {
            spec,
            runner,
            cancel,
            output,
        }
    }

    /// Run every phase and classify the result.
    pub async fn run(&self, options: &RunOptions, diag: &mut Diagnostics) -> RunOutcome {
        let scratch = match ScratchDir::new() {
            Ok(scratch) => scratch,
            Err(e) => return RunOutcome::from_error(DeployError::Scratch(e)),
        };
        tracing::debug!("Rendering manifests into {}", scratch.path().display());

        let result = self.execute(options, &scratch, diag).await;

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            diag.warn(Warning::scratch_cleanup(format!(
                "Failed removing rendered manifests at {}: {}",
                scratch_path.display(),
                e
            )));
        }

        match result {
            Ok(outcome) => outcome,
            Err(error) => RunOutcome::from_error(error),
        }
    }

    async fn execute(
        &self,
        options: &RunOptions,
        scratch: &ScratchDir,
        diag: &mut Diagnostics,
    ) -> Result<RunOutcome, DeployError> {
        let spec = self.spec;
        let waiter = ReadinessWaiter::new(self.runner, self.cancel.clone());

        self.output.progress(&format!(
            "  → Rendering {} manifest(s)...",
            spec.manifests.len()
        ));
        let release = Release::render(spec, &options.base_dir, scratch)?;

        self.output.progress(&format!(
            "  → Validating manifests against namespace {} (server-side dry run)...",
            spec.namespace
        ));
        let (release, diffs) = release.validate(self.runner, diag).await?;
        self.report_diffs(&diffs);

        if spec.dry_run || options.validate_only {
            self.output.progress("  ✓ Dry run complete, nothing applied");
            return Ok(RunOutcome::DryRunCompleted {
                manifests: release.manifests().len(),
            });
        }

        if spec.await_zero_replicas && !spec.workloads.deployments.is_empty() {
            self.output
                .progress("  → Waiting for deployments to scale to 0 replicas...");
            release.await_scale_down(&waiter, diag).await?;
        }

        self.output.progress("  → Applying manifests...");
        let release = release.apply(self.runner).await?;

        if spec.workloads.rollouts().next().is_some() {
            self.output.progress("  → Waiting for rollouts...");
        }
        let release = release.await_rollouts(&waiter).await?;

        if spec.job_timeout().is_some() && !spec.workloads.jobs.is_empty() {
            self.output.progress(&format!(
                "  → Waiting up to {}s for {} job(s)...",
                spec.job_timeout_seconds,
                spec.workloads.jobs.len()
            ));
        }
        let release = release.await_jobs(&waiter, diag).await?;

        let manifests = release.finish();
        self.output
            .progress(&format!("  ✓ Applied {manifests} manifest(s) to {}", spec.namespace));
        Ok(RunOutcome::Applied { manifests })
    }

    fn report_diffs(&self, diffs: &[DiffReport]) {
        for diff in diffs {
            match &diff.changes {
                Some(changes) => self.output.progress(&format!(
                    "  → Changes for {}:\n{}",
                    diff.manifest.display(),
                    changes.trim_end()
                )),
                None => tracing::info!("No changes for {}", diff.manifest.display()),
            }
        }
    }
}
