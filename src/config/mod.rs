// ABOUTME: Deploy configuration: which manifests to apply and what to wait for.
// ABOUTME: Handles YAML parsing, convention defaults, and validation.

mod deserialize;
mod init;
mod poll;
mod workloads;

pub use init::init_config;
pub use poll::PollIntervals;
pub use workloads::Workloads;

use crate::error::{Error, Result};
use crate::types::Namespace;
use deserialize::{deserialize_manifests, deserialize_namespace, deserialize_placeholders};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "kubeship.yml";
pub const CONFIG_FILENAME_ALT: &str = "kubeship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".kubeship/config.yml";

/// Manifest applied when none are configured.
pub const DEFAULT_MANIFEST: &str = "kubernetes.yaml";

/// Everything one deploy run needs to know. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploySpec {
    #[serde(
        default = "default_manifests",
        deserialize_with = "deserialize_manifests"
    )]
    pub manifests: NonEmpty<PathBuf>,

    #[serde(deserialize_with = "deserialize_namespace")]
    pub namespace: Namespace,

    #[serde(default, deserialize_with = "deserialize_placeholders")]
    pub placeholders: BTreeMap<String, String>,

    #[serde(flatten)]
    pub workloads: Workloads,

    #[serde(default, rename = "awaitZeroReplicas")]
    pub await_zero_replicas: bool,

    #[serde(default, rename = "dryrun")]
    pub dry_run: bool,

    /// Budget for all jobs together; 0 skips job waits entirely.
    #[serde(default, rename = "jobtimeoutseconds")]
    pub job_timeout_seconds: u64,

    #[serde(default, rename = "pollIntervals")]
    pub poll_intervals: PollIntervals,
}

fn default_manifests() -> NonEmpty<PathBuf> {
    NonEmpty::new(PathBuf::from(DEFAULT_MANIFEST))
}

impl DeploySpec {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Check constraints serde can't express.
    pub fn validate(&self) -> Result<()> {
        for name in self.placeholders.keys() {
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                return Err(Error::InvalidConfig(format!(
                    "placeholder name '{name}' may only contain letters, digits and underscores"
                )));
            }
        }

        for manifest in self.manifests.iter() {
            if manifest.components().any(|c| c == Component::ParentDir) {
                return Err(Error::InvalidConfig(format!(
                    "manifest path {} must not contain '..'",
                    manifest.display()
                )));
            }
        }

        self.workloads.check_unique()?;

        Ok(())
    }

    /// Overall job budget, or `None` when job waits are disabled.
    pub fn job_timeout(&self) -> Option<Duration> {
        (self.job_timeout_seconds > 0).then(|| Duration::from_secs(self.job_timeout_seconds))
    }

    pub fn template() -> Self {
        DeploySpec {
            manifests: default_manifests(),
            namespace: Namespace::default(),
            placeholders: BTreeMap::new(),
            workloads: Workloads::default(),
            await_zero_replicas: false,
            dry_run: false,
            job_timeout_seconds: 0,
            poll_intervals: PollIntervals::default(),
        }
    }
}
