// ABOUTME: Workload references grouped by kind.
// ABOUTME: Order within each list is the order the deployer waits in.

use serde::Deserialize;
use std::collections::HashSet;

use super::deserialize::deserialize_names;
use crate::error::{Error, Result};
use crate::types::{ResourceName, WorkloadKind};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workloads {
    #[serde(default, deserialize_with = "deserialize_names")]
    pub deployments: Vec<ResourceName>,

    #[serde(default, deserialize_with = "deserialize_names")]
    pub statefulsets: Vec<ResourceName>,

    #[serde(default, deserialize_with = "deserialize_names")]
    pub daemonsets: Vec<ResourceName>,

    #[serde(default, deserialize_with = "deserialize_names")]
    pub jobs: Vec<ResourceName>,
}

impl Workloads {
    /// Names for one kind, in declared order.
    pub fn of_kind(&self, kind: WorkloadKind) -> &[ResourceName] {
        match kind {
            WorkloadKind::Deployment => &self.deployments,
            WorkloadKind::StatefulSet => &self.statefulsets,
            WorkloadKind::DaemonSet => &self.daemonsets,
            WorkloadKind::Job => &self.jobs,
        }
    }

    /// Workloads with a rollout: deployments, then statefulsets, then daemonsets.
    pub fn rollouts(&self) -> impl Iterator<Item = (WorkloadKind, &ResourceName)> {
        WorkloadKind::ALL
            .into_iter()
            .filter(WorkloadKind::has_rollout)
            .flat_map(move |kind| self.of_kind(kind).iter().map(move |name| (kind, name)))
    }

    /// Reject names listed twice for the same kind.
    pub fn check_unique(&self) -> Result<()> {
        for kind in WorkloadKind::ALL {
            let mut seen = HashSet::new();
            for name in self.of_kind(kind) {
                if !seen.insert(name) {
                    return Err(Error::InvalidConfig(format!(
                        "{kind} '{name}' is listed more than once"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<ResourceName> {
        list.iter().map(|n| ResourceName::new(n).unwrap()).collect()
    }

    #[test]
    fn rollouts_follow_kind_order() {
        let workloads = Workloads {
            deployments: names(&["api", "web"]),
            statefulsets: names(&["db"]),
            daemonsets: names(&["agent"]),
            jobs: names(&["migrate"]),
        };

        let order: Vec<_> = workloads
            .rollouts()
            .map(|(kind, name)| format!("{kind}/{name}"))
            .collect();
        assert_eq!(
            order,
            ["deployment/api", "deployment/web", "statefulset/db", "daemonset/agent"]
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let workloads = Workloads {
            jobs: names(&["migrate", "migrate"]),
            ..Default::default()
        };
        assert!(workloads.check_unique().is_err());
    }
}
