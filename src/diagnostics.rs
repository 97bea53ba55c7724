// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects advisory failures that never change the run outcome but are shown to users.

/// Collects non-fatal warnings during a deploy run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a deploy run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// `kubectl diff` failed for a manifest.
    pub fn diff_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DiffFailed,
            message: message.into(),
        }
    }

    /// A deployment awaited for scale-down does not exist yet.
    pub fn workload_absent(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::WorkloadAbsent,
            message: message.into(),
        }
    }

    /// Logs of a timed-out job could not be fetched.
    pub fn logs_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LogsUnavailable,
            message: message.into(),
        }
    }

    /// The scratch directory could not be removed.
    pub fn scratch_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ScratchCleanup,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a deploy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Diff against live state failed (advisory only).
    DiffFailed,
    /// Deployment not found during the zero-replica wait (first deploy).
    WorkloadAbsent,
    /// Failed to retrieve logs for a timed-out job.
    LogsUnavailable,
    /// Failed to remove rendered manifests.
    ScratchCleanup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::diff_failed("diff exited with status 2"));
        diag.warn(Warning::workload_absent("deployment 'api' does not exist yet"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
        assert_eq!(diag.warnings()[0].kind, WarningKind::DiffFailed);
        assert_eq!(diag.warnings()[1].kind, WarningKind::WorkloadAbsent);
    }
}
