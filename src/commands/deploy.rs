// ABOUTME: Deploy command implementation.
// ABOUTME: Wires kubectl, the orchestrator, and user-facing reporting together.

use kubeship::config::DeploySpec;
use kubeship::deploy::{Orchestrator, RunOptions, RunOutcome};
use kubeship::diagnostics::Diagnostics;
use kubeship::kubectl::Kubectl;
use kubeship::output::Output;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Run a full deploy (or validation-only run) and report the outcome.
pub async fn deploy(
    spec: DeploySpec,
    options: RunOptions,
    kubectl: &Path,
    cancel: CancellationToken,
    mut output: Output,
) -> RunOutcome {
    output.start_timer();
    let runner = Kubectl::new(kubectl, cancel.clone());
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying {} manifest(s) to namespace {}",
        spec.manifests.len(),
        spec.namespace
    ));

    let outcome = Orchestrator::new(&spec, &runner, cancel, &output)
        .run(&options, &mut diag)
        .await;

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    report(&output, &outcome);
    outcome
}

fn report(output: &Output, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Applied { manifests } => {
            output.success(&format!("Deployment complete! ({manifests} manifest(s) applied)"))
        }
        RunOutcome::DryRunCompleted { manifests } => output.success(&format!(
            "Dry run complete! ({manifests} manifest(s) validated, nothing applied)"
        )),
        RunOutcome::ValidationFailed { manifest, error } => {
            output.progress(&format!(
                "  ✗ {} failed validation; no manifests were applied",
                manifest.display()
            ));
            output.error(&error.to_string(), Some(outcome.name()));
        }
        RunOutcome::Timeout { jobs, error } => {
            for job in jobs {
                output.detail(
                    &format!("Logs for job '{}'", job.name),
                    job.logs.as_deref().unwrap_or("<unavailable>"),
                );
            }
            output.error(&error.to_string(), Some(outcome.name()));
        }
        RunOutcome::Fatal { error } => output.error(&error.to_string(), Some(outcome.name())),
    }
}
