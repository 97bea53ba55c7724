// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates kubeship.yml template files.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Namespace;

use super::{CONFIG_FILENAME, DeploySpec};

/// Write a starter `kubeship.yml` into `dir` and return its path.
pub fn init_config(dir: &Path, namespace: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut spec = DeploySpec::template();

    if let Some(ns) = namespace {
        spec.namespace = Namespace::new(ns).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    let yaml = generate_template_yaml(&spec);
    std::fs::write(&config_path, yaml)?;

    Ok(config_path)
}

fn generate_template_yaml(spec: &DeploySpec) -> String {
    format!(
        r#"namespace: {}
manifests:
  - {}
# Substituted for $NAME / ${{NAME}} in every manifest; unknown names are left as-is
placeholders:
  APP_NAME: my-app
deployments:
  - my-app
# statefulsets: []
# daemonsets: []
# jobs: []
# Wait for deployments to scale to 0 before applying
# awaitZeroReplicas: true
# Validate and diff only
# dryrun: true
# Total seconds to wait for all jobs; 0 skips job waits
# jobtimeoutseconds: 300
"#,
        spec.namespace,
        spec.manifests.first().display(),
    )
}
