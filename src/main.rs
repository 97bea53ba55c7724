// ABOUTME: Entry point for the kubeship CLI application.
// ABOUTME: Parses arguments, wires cancellation to signals, and dispatches commands.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use kubeship::config;
use kubeship::deploy::RunOptions;
use kubeship::error::Result;
use kubeship::output::Output;
use std::env;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Release action that validates without applying.
const RELEASE_ACTION_DIFF: &str = "diff";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::warn!("Shutdown signal received, cancelling deploy");
        cancel_on_signal.cancel();
    });

    let output = Output::new(cli.output_mode());
    match run(cli, output, cancel).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, output: Output, cancel: CancellationToken) -> Result<i32> {
    match cli.command {
        Commands::Deploy {
            spec,
            kubectl,
            release_action,
            dry_run,
        } => {
            let deploy_spec = commands::load_spec(&spec)?;
            let options = RunOptions {
                base_dir: spec.workdir,
                validate_only: dry_run
                    || release_action.as_deref() == Some(RELEASE_ACTION_DIFF),
            };
            let outcome =
                commands::deploy(deploy_spec, options, &kubectl.kubectl, cancel, output).await;
            Ok(outcome.exit_code())
        }
        Commands::Diff { spec, kubectl } => {
            let deploy_spec = commands::load_spec(&spec)?;
            let options = RunOptions {
                base_dir: spec.workdir,
                validate_only: true,
            };
            let outcome =
                commands::deploy(deploy_spec, options, &kubectl.kubectl, cancel, output).await;
            Ok(outcome.exit_code())
        }
        Commands::Render { spec } => {
            let deploy_spec = commands::load_spec(&spec)?;
            commands::render(&deploy_spec, &spec.workdir)?;
            Ok(0)
        }
        Commands::Init { namespace, force } => {
            let cwd = env::current_dir()?;
            let path = config::init_config(&cwd, namespace.as_deref(), force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(0)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
