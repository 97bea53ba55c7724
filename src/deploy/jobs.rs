// ABOUTME: Job completion phase under a shared timeout budget.
// ABOUTME: A countdown task fires a deadline token that every job poll races against.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::diagnostics::{Diagnostics, Warning};
use crate::kubectl::{CommandRunner, ExecErrorKind, args};
use crate::types::{Namespace, ResourceName};

use super::readiness::{ReadinessQuery, ReadinessWaiter, WaitOutcome};
use super::DeployError;

/// A job still pending when the budget ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedOutJob {
    pub name: ResourceName,
    /// Output of `kubectl logs job/<name>`, if it could be fetched.
    pub logs: Option<String>,
}

/// Wait for `jobs` in order, all within one `budget`.
///
/// Once the budget is spent the current job and every job after it are
/// reported as timed out without further polling, with their logs attached.
/// Jobs that completed earlier are unaffected.
pub async fn wait_for_jobs<R: CommandRunner + ?Sized>(
    waiter: &ReadinessWaiter<'_, R>,
    jobs: &[ResourceName],
    namespace: &Namespace,
    budget: Duration,
    poll_interval: Duration,
    diag: &mut Diagnostics,
) -> Result<(), DeployError> {
    let deadline = CancellationToken::new();
    let countdown = tokio::spawn({
        let deadline = deadline.clone();
        async move {
            tokio::time::sleep(budget).await;
            deadline.cancel();
        }
    });

    let result = poll_jobs(waiter, jobs, namespace, &deadline, poll_interval, diag).await;
    countdown.abort();

    let timed_out = result?;
    if timed_out.is_empty() {
        return Ok(());
    }

    Err(DeployError::JobsTimedOut {
        jobs: timed_out,
        seconds: budget.as_secs(),
    })
}

async fn poll_jobs<R: CommandRunner + ?Sized>(
    waiter: &ReadinessWaiter<'_, R>,
    jobs: &[ResourceName],
    namespace: &Namespace,
    deadline: &CancellationToken,
    poll_interval: Duration,
    diag: &mut Diagnostics,
) -> Result<Vec<TimedOutJob>, DeployError> {
    let mut timed_out = Vec::new();

    for job in jobs {
        if !deadline.is_cancelled() {
            tracing::info!("Waiting for job '{}' to finish...", job);
            let query = ReadinessQuery::job_succeeded(job, namespace);
            match waiter.wait_for(&query, poll_interval, Some(deadline)).await? {
                WaitOutcome::Satisfied | WaitOutcome::Absent => {
                    tracing::info!("Job '{}' finished successfully.", job);
                    continue;
                }
                WaitOutcome::TimedOut => {}
            }
        }

        let logs = fetch_logs(waiter.runner(), job, namespace, diag).await?;
        tracing::error!(
            "Job '{}' timed-out.\nLogs:\n{}",
            job,
            logs.as_deref().unwrap_or("<unavailable>")
        );
        timed_out.push(TimedOutJob {
            name: job.clone(),
            logs,
        });
    }

    Ok(timed_out)
}

/// Logs are diagnostics only; failing to get them is a warning.
async fn fetch_logs<R: CommandRunner + ?Sized>(
    runner: &R,
    job: &ResourceName,
    namespace: &Namespace,
    diag: &mut Diagnostics,
) -> Result<Option<String>, DeployError> {
    match runner.capture(&args::job_logs(job, namespace)).await {
        Ok(output) if output.success() => Ok(Some(output.stdout)),
        Ok(output) => {
            diag.warn(Warning::logs_unavailable(format!(
                "Failed retrieving logs for job '{}': {}",
                job,
                output.into_failure()
            )));
            Ok(None)
        }
        Err(e) if e.kind() == ExecErrorKind::Cancelled => Err(DeployError::Cancelled),
        Err(e) => {
            diag.warn(Warning::logs_unavailable(format!(
                "Failed retrieving logs for job '{}': {}",
                job, e
            )));
            Ok(None)
        }
    }
}
