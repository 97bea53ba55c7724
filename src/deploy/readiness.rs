// ABOUTME: Readiness waiter polling workload state through kubectl.
// ABOUTME: One loop for replica, rollout and job conditions, with optional deadline.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::kubectl::{CommandOutput, CommandRunner, ExecError, args};
use crate::types::{Namespace, ResourceName, WorkloadKind};

use super::DeployError;

/// Predicate over a workload's observed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Deployment `.spec.replicas` is 0. A missing deployment counts as satisfied.
    ZeroReplicas,
    /// `kubectl rollout status` reports success.
    RolloutComplete,
    /// Job `.status.succeeded` is exactly 1.
    JobSucceeded,
}

/// What to wait for, and on which resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessQuery {
    pub kind: WorkloadKind,
    pub name: ResourceName,
    pub namespace: Namespace,
    pub condition: Condition,
}

impl ReadinessQuery {
    pub fn zero_replicas(name: &ResourceName, namespace: &Namespace) -> Self {
        Self {
            kind: WorkloadKind::Deployment,
            name: name.clone(),
            namespace: namespace.clone(),
            condition: Condition::ZeroReplicas,
        }
    }

    pub fn rollout(kind: WorkloadKind, name: &ResourceName, namespace: &Namespace) -> Self {
        Self {
            kind,
            name: name.clone(),
            namespace: namespace.clone(),
            condition: Condition::RolloutComplete,
        }
    }

    pub fn job_succeeded(name: &ResourceName, namespace: &Namespace) -> Self {
        Self {
            kind: WorkloadKind::Job,
            name: name.clone(),
            namespace: namespace.clone(),
            condition: Condition::JobSucceeded,
        }
    }

    fn unexpected(&self, output: &str, reason: impl Into<String>) -> DeployError {
        DeployError::UnexpectedOutput {
            kind: self.kind,
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            output: output.to_string(),
            reason: reason.into(),
        }
    }

    fn probe_failed(&self, source: ExecError) -> DeployError {
        DeployError::exec(source, |source| DeployError::Probe {
            kind: self.kind,
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            source,
        })
    }
}

/// How a wait ended, short of a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The condition holds.
    Satisfied,
    /// The resource doesn't exist, which satisfies a zero-replica wait.
    Absent,
    /// The deadline fired before the condition held.
    TimedOut,
}

/// Result of a single poll.
#[derive(Debug, PartialEq, Eq)]
enum Observation {
    Ready,
    Absent,
    Pending(String),
}

/// Polls workloads through a `CommandRunner` until a condition holds.
pub struct ReadinessWaiter<'r, R: ?Sized> {
    runner: &'r R,
    cancel: CancellationToken,
}

impl<'r, R: CommandRunner + ?Sized> ReadinessWaiter<'r, R> {
    /// Create a waiter whose sleeps end early when `cancel` fires.
    pub fn new(runner: &'r R, cancel: CancellationToken) -> Self {
        Self { runner, cancel }
    }

    pub fn runner(&self) -> &'r R {
        self.runner
    }

    /// Poll until `query` is satisfied, `deadline` fires, or a poll fails.
    ///
    /// A command failure is fatal and never retried; only an unmet condition
    /// is. With no deadline the wait is unbounded.
    pub async fn wait_for(
        &self,
        query: &ReadinessQuery,
        poll_interval: Duration,
        deadline: Option<&CancellationToken>,
    ) -> Result<WaitOutcome, DeployError> {
        loop {
            if deadline.is_some_and(CancellationToken::is_cancelled) {
                return Ok(WaitOutcome::TimedOut);
            }

            // The probe future owns the child process; losing the race kills it.
            let observation = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(DeployError::Cancelled),
                _ = deadline_fired(deadline) => return Ok(WaitOutcome::TimedOut),
                observation = self.probe(query) => observation?,
            };

            match observation {
                Observation::Ready => return Ok(WaitOutcome::Satisfied),
                Observation::Absent => return Ok(WaitOutcome::Absent),
                Observation::Pending(state) => {
                    tracing::info!(
                        "{} '{}' {}; sleeping for {:?}",
                        query.kind,
                        query.name,
                        state,
                        poll_interval
                    );
                }
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(DeployError::Cancelled),
                _ = deadline_fired(deadline) => return Ok(WaitOutcome::TimedOut),
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
    }

    async fn probe(&self, query: &ReadinessQuery) -> Result<Observation, DeployError> {
        let name = &query.name;
        let namespace = &query.namespace;

        match query.condition {
            Condition::ZeroReplicas => {
                let output = self
                    .runner
                    .capture(&args::replicas(name, namespace))
                    .await
                    .map_err(|e| query.probe_failed(e))?;

                if !output.success() {
                    if output.is_not_found() {
                        return Ok(Observation::Absent);
                    }
                    return Err(query.probe_failed(output.into_failure()));
                }

                let replicas = parse_count(&output)
                    .ok_or_else(|| query.unexpected(&output.stdout, "expected a replica count"))?;
                Ok(if replicas == 0 {
                    Observation::Ready
                } else {
                    Observation::Pending(format!("has {replicas} replicas"))
                })
            }
            Condition::RolloutComplete => {
                self.runner
                    .run(&args::rollout_status(query.kind, name, namespace))
                    .await
                    .map_err(|e| query.probe_failed(e))?;
                Ok(Observation::Ready)
            }
            Condition::JobSucceeded => {
                let output = self
                    .runner
                    .run(&args::job_succeeded(name, namespace))
                    .await
                    .map_err(|e| query.probe_failed(e))?;

                // `.status.succeeded` is absent until the first pod succeeds.
                if output.value().is_empty() {
                    return Ok(Observation::Pending("has not succeeded yet".to_string()));
                }

                let succeeded = parse_count(&output).ok_or_else(|| {
                    query.unexpected(&output.stdout, "expected a succeeded count")
                })?;
                Ok(if succeeded == 1 {
                    Observation::Ready
                } else {
                    Observation::Pending(format!("reports {succeeded} succeeded"))
                })
            }
        }
    }
}

fn parse_count(output: &CommandOutput) -> Option<u32> {
    output.value().parse().ok()
}

/// Resolves when `deadline` is cancelled; never resolves without one.
async fn deadline_fired(deadline: Option<&CancellationToken>) {
    match deadline {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Answers every command with the next canned output, repeating the last one.
    struct Canned {
        outputs: Mutex<Vec<CommandOutput>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl Canned {
        fn new(outputs: Vec<(Option<i32>, &str, &str)>) -> Self {
            let outputs = outputs
                .into_iter()
                .rev()
                .map(|(code, out, err)| {
                    CommandOutput::new("kubectl", code, out.to_string(), err.to_string())
                })
                .collect();
            Self {
                outputs: Mutex::new(outputs),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl CommandRunner for Canned {
        async fn capture(&self, args: &[String]) -> Result<CommandOutput, ExecError> {
            self.calls.lock().push(args.to_vec());
            let mut outputs = self.outputs.lock();
            let output = if outputs.len() > 1 {
                outputs.pop()
            } else {
                outputs.last().cloned()
            };
            Ok(output.expect("no canned outputs"))
        }
    }

    fn api() -> (ResourceName, Namespace) {
        (
            ResourceName::new("api").unwrap(),
            Namespace::new("prod").unwrap(),
        )
    }

    const FAST: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn zero_replicas_polls_until_scaled_down() {
        let runner = Canned::new(vec![
            (Some(0), "'2'", ""),
            (Some(0), "'1'", ""),
            (Some(0), "'0'", ""),
        ]);
        let waiter = ReadinessWaiter::new(&runner, CancellationToken::new());
        let (name, ns) = api();

        let outcome = waiter
            .wait_for(&ReadinessQuery::zero_replicas(&name, &ns), FAST, None)
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Satisfied);
        assert_eq!(runner.calls(), 3);
    }

    #[tokio::test]
    async fn missing_deployment_is_absent_without_polling() {
        let runner = Canned::new(vec![(
            Some(1),
            "",
            "Error from server (NotFound): deployments.apps \"api\" not found",
        )]);
        let waiter = ReadinessWaiter::new(&runner, CancellationToken::new());
        let (name, ns) = api();

        let outcome = waiter
            .wait_for(&ReadinessQuery::zero_replicas(&name, &ns), FAST, None)
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Absent);
        assert_eq!(runner.calls(), 1);
    }

    #[tokio::test]
    async fn other_failures_are_fatal() {
        let runner = Canned::new(vec![(Some(1), "", "Unable to connect to the server")]);
        let waiter = ReadinessWaiter::new(&runner, CancellationToken::new());
        let (name, ns) = api();

        let err = waiter
            .wait_for(&ReadinessQuery::zero_replicas(&name, &ns), FAST, None)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Probe { .. }));
    }

    #[tokio::test]
    async fn malformed_replica_count_is_fatal() {
        let runner = Canned::new(vec![(Some(0), "three", "")]);
        let waiter = ReadinessWaiter::new(&runner, CancellationToken::new());
        let (name, ns) = api();

        let err = waiter
            .wait_for(&ReadinessQuery::zero_replicas(&name, &ns), FAST, None)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::UnexpectedOutput { .. }));
        assert_eq!(runner.calls(), 1);
    }

    #[tokio::test]
    async fn not_found_job_is_fatal() {
        let runner = Canned::new(vec![(
            Some(1),
            "",
            "Error from server (NotFound): jobs.batch \"api\" not found",
        )]);
        let waiter = ReadinessWaiter::new(&runner, CancellationToken::new());
        let (name, ns) = api();

        let err = waiter
            .wait_for(&ReadinessQuery::job_succeeded(&name, &ns), FAST, None)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Probe { .. }));
    }

    #[tokio::test]
    async fn job_waits_for_succeeded_count() {
        let runner = Canned::new(vec![(Some(0), "", ""), (Some(0), "'0'", ""), (Some(0), "'1'", "")]);
        let waiter = ReadinessWaiter::new(&runner, CancellationToken::new());
        let (name, ns) = api();

        let outcome = waiter
            .wait_for(&ReadinessQuery::job_succeeded(&name, &ns), FAST, None)
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::Satisfied);
        assert_eq!(runner.calls(), 3);
    }

    #[tokio::test]
    async fn job_with_other_succeeded_count_keeps_waiting() {
        let runner = Canned::new(vec![(Some(0), "'2'", "")]);
        let waiter = ReadinessWaiter::new(&runner, CancellationToken::new());
        let (name, ns) = api();
        let deadline = CancellationToken::new();
        tokio::spawn({
            let deadline = deadline.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                deadline.cancel();
            }
        });

        let outcome = waiter
            .wait_for(
                &ReadinessQuery::job_succeeded(&name, &ns),
                Duration::from_millis(5),
                Some(&deadline),
            )
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(runner.calls() >= 1);
    }

    #[tokio::test]
    async fn fired_deadline_times_out_before_polling() {
        let runner = Canned::new(vec![]);
        let waiter = ReadinessWaiter::new(&runner, CancellationToken::new());
        let (name, ns) = api();
        let deadline = CancellationToken::new();
        deadline.cancel();

        let outcome = waiter
            .wait_for(&ReadinessQuery::job_succeeded(&name, &ns), FAST, Some(&deadline))
            .await
            .unwrap();

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert_eq!(runner.calls(), 0);
    }

    #[tokio::test]
    async fn cancellation_interrupts_sleep() {
        let runner = Canned::new(vec![(Some(0), "'3'", "")]);
        let cancel = CancellationToken::new();
        let waiter = ReadinessWaiter::new(&runner, cancel.clone());
        let (name, ns) = api();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = waiter
            .wait_for(
                &ReadinessQuery::zero_replicas(&name, &ns),
                Duration::from_secs(3600),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Cancelled));
    }
}
