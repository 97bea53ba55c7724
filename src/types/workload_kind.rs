// ABOUTME: Workload kinds the deployer waits on.
// ABOUTME: Maps each kind to the resource type kubectl expects.

use std::fmt;

/// A kind of workload referenced by the deploy config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
}

impl WorkloadKind {
    /// Every kind, in the order the deployer waits on them.
    pub const ALL: [WorkloadKind; 4] = [
        WorkloadKind::Deployment,
        WorkloadKind::StatefulSet,
        WorkloadKind::DaemonSet,
        WorkloadKind::Job,
    ];

    /// Resource type as passed to `kubectl get` and `kubectl rollout status`.
    pub fn as_kubectl(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "deployment",
            WorkloadKind::StatefulSet => "statefulset",
            WorkloadKind::DaemonSet => "daemonset",
            WorkloadKind::Job => "job",
        }
    }

    /// Whether `kubectl rollout status` applies to this kind.
    pub fn has_rollout(&self) -> bool {
        !matches!(self, WorkloadKind::Job)
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_kubectl())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_jobs_lack_a_rollout() {
        let with_rollout: Vec<_> = WorkloadKind::ALL
            .into_iter()
            .filter(WorkloadKind::has_rollout)
            .collect();
        assert_eq!(
            with_rollout,
            [
                WorkloadKind::Deployment,
                WorkloadKind::StatefulSet,
                WorkloadKind::DaemonSet,
            ]
        );
    }
}
