// ABOUTME: Terminal result of a deploy run.
// ABOUTME: The process exit code is derived from it.

use std::path::PathBuf;

use super::DeployError;
use super::jobs::TimedOutJob;

/// How a deploy run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// All manifests applied and every wait satisfied.
    Applied { manifests: usize },
    /// Validation passed; the run stopped before mutating anything.
    DryRunCompleted { manifests: usize },
    /// A manifest failed the server-side dry run; nothing was applied.
    ValidationFailed {
        manifest: PathBuf,
        error: DeployError,
    },
    /// Jobs did not finish within their budget.
    Timeout {
        jobs: Vec<TimedOutJob>,
        error: DeployError,
    },
    /// Any other fatal error.
    Fatal { error: DeployError },
}

impl RunOutcome {
    /// Classify a run-ending error.
    pub fn from_error(error: DeployError) -> Self {
        match error {
            DeployError::DryRunRejected { ref manifest, .. } => RunOutcome::ValidationFailed {
                manifest: manifest.clone(),
                error,
            },
            DeployError::JobsTimedOut { ref jobs, .. } => RunOutcome::Timeout {
                jobs: jobs.clone(),
                error,
            },
            error => RunOutcome::Fatal { error },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            RunOutcome::Applied { .. } | RunOutcome::DryRunCompleted { .. }
        )
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// The error that ended the run, if it failed.
    pub fn error(&self) -> Option<&DeployError> {
        match self {
            RunOutcome::Applied { .. } | RunOutcome::DryRunCompleted { .. } => None,
            RunOutcome::ValidationFailed { error, .. }
            | RunOutcome::Timeout { error, .. }
            | RunOutcome::Fatal { error } => Some(error),
        }
    }

    /// Short machine-readable name, used in JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            RunOutcome::Applied { .. } => "applied",
            RunOutcome::DryRunCompleted { .. } => "dry-run-completed",
            RunOutcome::ValidationFailed { .. } => "validation-failed",
            RunOutcome::Timeout { .. } => "timeout",
            RunOutcome::Fatal { .. } => "fatal",
        }
    }
}
