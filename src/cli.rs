// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use kubeship::kubectl::DEFAULT_PROGRAM;
use kubeship::output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kubeship")]
#[command(about = "Render, validate and apply Kubernetes manifests, then wait for rollouts")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

/// Where the deploy config comes from.
#[derive(Args, Debug)]
pub struct SpecArgs {
    /// Deploy config file (default: kubeship.yml in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Deploy config as inline YAML, e.g. from CI custom properties
    #[arg(
        long,
        env = "KUBESHIP_PARAMS_YAML",
        hide_env_values = true,
        conflicts_with = "config"
    )]
    pub params_yaml: Option<String>,

    /// Directory manifest paths are resolved against
    #[arg(short = 'C', long, default_value = ".")]
    pub workdir: PathBuf,
}

/// How to reach the cluster.
#[derive(Args, Debug)]
pub struct KubectlArgs {
    /// kubectl binary to invoke
    #[arg(long, env = "KUBESHIP_KUBECTL", default_value = DEFAULT_PROGRAM)]
    pub kubectl: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render, validate, apply and wait for workloads
    Deploy {
        #[command(flatten)]
        spec: SpecArgs,

        #[command(flatten)]
        kubectl: KubectlArgs,

        /// Release action; "diff" validates without applying
        #[arg(long, env = "KUBESHIP_RELEASE_ACTION")]
        release_action: Option<String>,

        /// Validate and diff only, whatever the config says
        #[arg(long)]
        dry_run: bool,
    },

    /// Render, validate and diff without applying anything
    Diff {
        #[command(flatten)]
        spec: SpecArgs,

        #[command(flatten)]
        kubectl: KubectlArgs,
    },

    /// Print rendered manifests without contacting the cluster
    Render {
        #[command(flatten)]
        spec: SpecArgs,
    },

    /// Initialize a new kubeship.yml configuration file
    Init {
        /// Target namespace for the template
        #[arg(short, long)]
        namespace: Option<String>,

        /// Overwrite an existing kubeship.yml
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn deploy_reads_env_fallbacks() {
        temp_env::with_vars(
            [
                ("KUBESHIP_PARAMS_YAML", Some("namespace: prod\n")),
                ("KUBESHIP_RELEASE_ACTION", Some("diff")),
                ("KUBESHIP_KUBECTL", Some("/opt/bin/kubectl")),
            ],
            || {
                let Commands::Deploy {
                    spec,
                    kubectl,
                    release_action,
                    dry_run,
                } = parse(&["kubeship", "deploy"]).command
                else {
                    panic!("expected deploy");
                };
                assert_eq!(spec.params_yaml.as_deref(), Some("namespace: prod\n"));
                assert_eq!(release_action.as_deref(), Some("diff"));
                assert_eq!(kubectl.kubectl, PathBuf::from("/opt/bin/kubectl"));
                assert!(!dry_run);
            },
        );
    }

    #[test]
    fn flags_override_env() {
        temp_env::with_var("KUBESHIP_RELEASE_ACTION", Some("diff"), || {
            let Commands::Deploy { release_action, .. } =
                parse(&["kubeship", "deploy", "--release-action", "deploy"]).command
            else {
                panic!("expected deploy");
            };
            assert_eq!(release_action.as_deref(), Some("deploy"));
        });
    }

    #[test]
    fn defaults_without_env() {
        temp_env::with_vars_unset(
            [
                "KUBESHIP_PARAMS_YAML",
                "KUBESHIP_RELEASE_ACTION",
                "KUBESHIP_KUBECTL",
            ],
            || {
                let Commands::Diff { spec, kubectl } = parse(&["kubeship", "diff"]).command else {
                    panic!("expected diff");
                };
                assert_eq!(spec.params_yaml, None);
                assert_eq!(spec.config, None);
                assert_eq!(spec.workdir, PathBuf::from("."));
                assert_eq!(kubectl.kubectl, PathBuf::from(DEFAULT_PROGRAM));
            },
        );
    }

    #[test]
    fn quiet_and_json_conflict() {
        assert!(Cli::try_parse_from(["kubeship", "--quiet", "--json", "diff"]).is_err());
        assert_eq!(parse(&["kubeship", "--json", "render"]).output_mode(), OutputMode::Json);
    }
}
