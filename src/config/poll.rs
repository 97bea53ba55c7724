// ABOUTME: Poll intervals for readiness waits.
// ABOUTME: Durations use humantime syntax (e.g. "10s", "500ms").

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PollIntervals {
    /// Between replica-count checks while waiting for scale-down.
    #[serde(default = "default_replicas", with = "humantime_serde")]
    pub replicas: Duration,

    /// Between job status checks.
    #[serde(default = "default_jobs", with = "humantime_serde")]
    pub jobs: Duration,
}

fn default_replicas() -> Duration {
    Duration::from_secs(10)
}

fn default_jobs() -> Duration {
    Duration::from_secs(2)
}

impl Default for PollIntervals {
    fn default() -> Self {
        PollIntervals {
            replicas: default_replicas(),
            jobs: default_jobs(),
        }
    }
}
