// ABOUTME: Validation gate run before any manifest is applied.
// ABOUTME: Server-side dry run for every manifest (fatal), then an advisory diff.

use std::path::PathBuf;

use crate::diagnostics::{Diagnostics, Warning};
use crate::kubectl::{CommandRunner, ExecErrorKind, args};
use crate::render::RenderedManifest;
use crate::types::Namespace;

use super::DeployError;

/// `kubectl diff` exits 1 when live state differs from the manifest.
const DIFF_HAS_CHANGES: i32 = 1;

/// Result of diffing one manifest against the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub manifest: PathBuf,
    /// Diff text when live state differs; `None` when identical or the diff failed.
    pub changes: Option<String>,
}

/// Dry-run every manifest against the API server.
///
/// Stops at the first rejection so that no manifest is applied when any of
/// them would fail.
pub async fn dry_run_all<R: CommandRunner + ?Sized>(
    runner: &R,
    manifests: &[RenderedManifest],
    namespace: &Namespace,
) -> Result<(), DeployError> {
    for manifest in manifests {
        tracing::info!(
            "Dry-running manifest '{}' in namespace {}...",
            manifest.source.display(),
            namespace
        );

        runner
            .run(&args::dry_run(&manifest.path, namespace))
            .await
            .map_err(|e| {
                DeployError::exec(e, |source| DeployError::DryRunRejected {
                    manifest: manifest.source.clone(),
                    namespace: namespace.clone(),
                    source,
                })
            })?;
    }

    Ok(())
}

/// Diff every manifest against live state.
///
/// Failures are recorded in `diag` and never abort the run; only
/// cancellation is returned as an error.
pub async fn diff_all<R: CommandRunner + ?Sized>(
    runner: &R,
    manifests: &[RenderedManifest],
    namespace: &Namespace,
    diag: &mut Diagnostics,
) -> Result<Vec<DiffReport>, DeployError> {
    let mut reports = Vec::with_capacity(manifests.len());

    for manifest in manifests {
        tracing::info!("Diffing manifest '{}'...", manifest.source.display());

        let changes = match runner.capture(&args::diff(&manifest.path, namespace)).await {
            Ok(output) if output.success() => None,
            Ok(output) if output.code == Some(DIFF_HAS_CHANGES) => Some(output.stdout),
            Ok(output) => {
                diag.warn(Warning::diff_failed(format!(
                    "Diff for manifest '{}' failed: {}",
                    manifest.source.display(),
                    output.into_failure()
                )));
                None
            }
            Err(e) if e.kind() == ExecErrorKind::Cancelled => return Err(DeployError::Cancelled),
            Err(e) => {
                diag.warn(Warning::diff_failed(format!(
                    "Diff for manifest '{}' failed: {}",
                    manifest.source.display(),
                    e
                )));
                None
            }
        };

        reports.push(DiffReport {
            manifest: manifest.source.clone(),
            changes,
        });
    }

    Ok(reports)
}
