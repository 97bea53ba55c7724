// ABOUTME: State transition methods for release orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::fmt;

use crate::diagnostics::{Diagnostics, Warning};
use crate::kubectl::{CommandRunner, args};

use super::gate::{self, DiffReport};
use super::jobs;
use super::readiness::{ReadinessQuery, ReadinessWaiter, WaitOutcome};
use super::release::Release;
use super::state::{Applied, Completed, Rendered, RolledOut, Validated};
use super::DeployError;

impl<'a, S: fmt::Debug> Release<'a, S> {
    /// Internal helper to transition to a new state.
    fn transition<T: fmt::Debug>(self, state: T) -> Release<'a, T> {
        tracing::debug!("Release {:?} -> {:?}", self.state, state);
        Release {
            spec: self.spec,
            manifests: self.manifests,
            state,
        }
    }
}

// =============================================================================
// Rendered -> Validated
// =============================================================================

impl<'a> Release<'a, Rendered> {
    /// Dry-run every manifest server-side, then diff them against live state.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::DryRunRejected` for the first rejected manifest;
    /// no diff runs in that case. Diff failures only add warnings to `diag`.
    #[must_use = "release state must be used"]
    pub async fn validate<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
        diag: &mut Diagnostics,
    ) -> Result<(Release<'a, Validated>, Vec<DiffReport>), DeployError> {
        gate::dry_run_all(runner, &self.manifests, self.namespace()).await?;
        let diffs = gate::diff_all(runner, &self.manifests, self.namespace(), diag).await?;
        Ok((self.transition(Validated), diffs))
    }
}

// =============================================================================
// Validated -> Applied
// =============================================================================

impl<'a> Release<'a, Validated> {
    /// Wait for every listed deployment to scale to zero replicas.
    ///
    /// A deployment that doesn't exist yet has nothing to wait for.
    pub async fn await_scale_down<R: CommandRunner + ?Sized>(
        &self,
        waiter: &ReadinessWaiter<'_, R>,
        diag: &mut Diagnostics,
    ) -> Result<(), DeployError> {
        let interval = self.spec.poll_intervals.replicas;

        for deployment in &self.spec.workloads.deployments {
            tracing::info!(
                "Awaiting for deployment '{}' to scale to 0 replicas...",
                deployment
            );
            let query = ReadinessQuery::zero_replicas(deployment, self.namespace());
            match waiter.wait_for(&query, interval, None).await? {
                WaitOutcome::Absent => diag.warn(Warning::workload_absent(format!(
                    "Deployment '{}' does not exist yet in namespace {}, no need to wait",
                    deployment,
                    self.namespace()
                ))),
                WaitOutcome::Satisfied | WaitOutcome::TimedOut => {
                    tracing::info!("Deployment '{}' has scaled to 0 replicas", deployment);
                }
            }
        }

        Ok(())
    }

    /// Apply every manifest, in order.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ApplyFailed` on the first failure. Manifests
    /// applied before it stay applied.
    #[must_use = "release state must be used"]
    pub async fn apply<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
    ) -> Result<Release<'a, Applied>, DeployError> {
        for manifest in &self.manifests {
            tracing::info!("Applying manifest '{}'...", manifest.source.display());
            runner
                .run(&args::apply(&manifest.path, self.namespace()))
                .await
                .map_err(|e| {
                    DeployError::exec(e, |source| DeployError::ApplyFailed {
                        manifest: manifest.source.clone(),
                        namespace: self.namespace().clone(),
                        source,
                    })
                })?;
        }

        Ok(self.transition(Applied))
    }
}

// =============================================================================
// Applied -> RolledOut
// =============================================================================

impl<'a> Release<'a, Applied> {
    /// Wait for deployments, then statefulsets, then daemonsets to roll out.
    #[must_use = "release state must be used"]
    pub async fn await_rollouts<R: CommandRunner + ?Sized>(
        self,
        waiter: &ReadinessWaiter<'_, R>,
    ) -> Result<Release<'a, RolledOut>, DeployError> {
        let interval = self.spec.poll_intervals.replicas;

        for (kind, name) in self.spec.workloads.rollouts() {
            tracing::info!("Waiting for {} '{}' to finish...", kind, name);
            let query = ReadinessQuery::rollout(kind, name, self.namespace());
            waiter.wait_for(&query, interval, None).await?;
        }

        Ok(self.transition(RolledOut))
    }
}

// =============================================================================
// RolledOut -> Completed
// =============================================================================

impl<'a> Release<'a, RolledOut> {
    /// Wait for jobs within the configured budget.
    ///
    /// Skipped entirely when the budget is 0.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::JobsTimedOut`, with logs of each pending job,
    /// when the budget runs out.
    #[must_use = "release state must be used"]
    pub async fn await_jobs<R: CommandRunner + ?Sized>(
        self,
        waiter: &ReadinessWaiter<'_, R>,
        diag: &mut Diagnostics,
    ) -> Result<Release<'a, Completed>, DeployError> {
        if let Some(budget) = self.spec.job_timeout() {
            jobs::wait_for_jobs(
                waiter,
                &self.spec.workloads.jobs,
                self.namespace(),
                budget,
                self.spec.poll_intervals.jobs,
                diag,
            )
            .await?;
        }

        Ok(self.transition(Completed))
    }
}

impl Release<'_, Completed> {
    /// Number of manifests applied.
    pub fn finish(self) -> usize {
        self.manifests.len()
    }
}
