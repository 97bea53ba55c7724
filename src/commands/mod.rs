// ABOUTME: Command module aggregator for the kubeship CLI.
// ABOUTME: Re-exports command handlers and shared config loading.

mod deploy;
mod render;

pub use deploy::deploy;
pub use render::render;

use crate::cli::SpecArgs;
use kubeship::config::DeploySpec;
use kubeship::error::Result;

/// Load the deploy spec from inline YAML, an explicit file, or discovery.
pub fn load_spec(args: &SpecArgs) -> Result<DeploySpec> {
    if let Some(yaml) = &args.params_yaml {
        return DeploySpec::from_yaml(yaml);
    }

    match &args.config {
        Some(path) => DeploySpec::load(path),
        None => DeploySpec::discover(&args.workdir),
    }
}
