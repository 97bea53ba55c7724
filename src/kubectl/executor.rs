// ABOUTME: Runs kubectl as a child process under the run's cancellation token.
// ABOUTME: Children are killed when the run is cancelled or the wait is abandoned.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use snafu::ResultExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::error::{CancelledSnafu, ExecError, SpawnSnafu, WaitSnafu};
use super::output::CommandOutput;

/// Program name used when no kubectl binary is configured.
pub const DEFAULT_PROGRAM: &str = "kubectl";

/// Something that can run kubectl commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command and capture its result, whatever the exit status.
    ///
    /// Only failures to run the process at all (or cancellation) are errors;
    /// callers inspect `CommandOutput` to handle expected failures such as a
    /// missing resource.
    async fn capture(&self, args: &[String]) -> Result<CommandOutput, ExecError>;

    /// Run a command, treating a non-zero exit as an error.
    async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecError> {
        let output = self.capture(args).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(output.into_failure())
        }
    }
}

/// Runs the real kubectl binary.
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: OsString,
    cancel: CancellationToken,
}

impl Kubectl {
    /// Create a runner for `program`, bound to the run-scoped `cancel` token.
    pub fn new(program: impl AsRef<Path>, cancel: CancellationToken) -> Self {
        Self {
            program: program.as_ref().as_os_str().to_owned(),
            cancel,
        }
    }

    fn command_line(&self, args: &[String]) -> String {
        let mut line = Path::new(&self.program).display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[async_trait]
impl CommandRunner for Kubectl {
    async fn capture(&self, args: &[String]) -> Result<CommandOutput, ExecError> {
        let command = self.command_line(args);

        if self.cancel.is_cancelled() {
            return CancelledSnafu { command }.fail();
        }

        tracing::debug!("Running {}", command);

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .context(SpawnSnafu {
                command: command.clone(),
            })?;

        // Dropping the wait future drops the child, which kills it.
        let output = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!("Cancelled {}", command);
                return CancelledSnafu { command }.fail();
            }
            output = child.wait_with_output() => output.context(WaitSnafu {
                command: command.clone(),
            })?,
        };

        let result = CommandOutput::new(
            command,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        );

        if !result.success() {
            tracing::debug!(
                "{} exited with {:?}: {}",
                result.command,
                result.code,
                result.stderr.trim()
            );
        }

        Ok(result)
    }
}
