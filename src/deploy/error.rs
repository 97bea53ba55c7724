// ABOUTME: Error types for deploy runs.
// ABOUTME: Covers rendering, dry-run rejection, kubectl failures, job timeouts, and cancellation.

use std::path::PathBuf;

use crate::kubectl::{ExecError, ExecErrorKind};
use crate::render::RenderError;
use crate::types::{Namespace, ResourceName, WorkloadKind};

use super::jobs::TimedOutJob;

/// Errors that end a deploy run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A manifest could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The scratch directory could not be created.
    #[error("failed creating a temporary directory for rendered manifests: {0}")]
    Scratch(#[source] std::io::Error),

    /// The server-side dry run rejected a manifest.
    #[error("dry run rejected manifest {} in namespace {namespace}: {source}", manifest.display())]
    DryRunRejected {
        manifest: PathBuf,
        namespace: Namespace,
        source: ExecError,
    },

    /// Applying a validated manifest failed.
    #[error("failed applying manifest {} to namespace {namespace}: {source}", manifest.display())]
    ApplyFailed {
        manifest: PathBuf,
        namespace: Namespace,
        source: ExecError,
    },

    /// Querying a workload's state failed.
    #[error("failed checking {kind} '{name}' in namespace {namespace}: {source}")]
    Probe {
        kind: WorkloadKind,
        name: ResourceName,
        namespace: Namespace,
        source: ExecError,
    },

    /// kubectl returned a value that doesn't parse.
    #[error("unexpected output {output:?} for {kind} '{name}' in namespace {namespace}: {reason}")]
    UnexpectedOutput {
        kind: WorkloadKind,
        name: ResourceName,
        namespace: Namespace,
        output: String,
        reason: String,
    },

    /// Jobs did not succeed within the job budget.
    #[error(
        "job(s) {} failed to complete successfully within timeout {seconds} seconds",
        job_names(jobs)
    )]
    JobsTimedOut { jobs: Vec<TimedOutJob>, seconds: u64 },

    /// The run was cancelled.
    #[error("deploy run cancelled")]
    Cancelled,
}

fn job_names(jobs: &[TimedOutJob]) -> String {
    jobs.iter()
        .map(|job| format!("'{}'", job.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Bad input discovered before touching the cluster.
    Configuration,
    /// A manifest failed the dry run; nothing was applied.
    Validation,
    /// A kubectl call failed or returned garbage.
    Execution,
    /// Jobs exceeded their budget.
    Timeout,
    /// The run was interrupted.
    Cancelled,
}

impl DeployError {
    /// Wrap a kubectl failure, keeping cancellation distinct from failure.
    pub(crate) fn exec(source: ExecError, wrap: impl FnOnce(ExecError) -> DeployError) -> Self {
        if source.kind() == ExecErrorKind::Cancelled {
            DeployError::Cancelled
        } else {
            wrap(source)
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Render(_) | DeployError::Scratch(_) => DeployErrorKind::Configuration,
            DeployError::DryRunRejected { .. } => DeployErrorKind::Validation,
            DeployError::ApplyFailed { .. }
            | DeployError::Probe { .. }
            | DeployError::UnexpectedOutput { .. } => DeployErrorKind::Execution,
            DeployError::JobsTimedOut { .. } => DeployErrorKind::Timeout,
            DeployError::Cancelled => DeployErrorKind::Cancelled,
        }
    }
}
