// ABOUTME: Command execution errors with SNAFU pattern.
// ABOUTME: Separates spawn failures, non-zero exits, and cancellation.

use snafu::Snafu;

use super::output::Recognized;

/// Failure running a kubectl command.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ExecError {
    #[snafu(display("failed to start `{command}`: {source}"))]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("failed waiting for `{command}`: {source}"))]
    Wait {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` exited with {}: {}", exit_description(*code), stderr.trim()))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
        recognized: Option<Recognized>,
    },

    #[snafu(display("`{command}` was cancelled"))]
    Cancelled { command: String },
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecErrorKind {
    /// The process could not be started or awaited.
    Process,
    /// The command ran and exited unsuccessfully.
    NonZeroExit,
    /// The run was cancelled while the command was in flight.
    Cancelled,
}

impl ExecError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ExecErrorKind {
        match self {
            ExecError::Spawn { .. } | ExecError::Wait { .. } => ExecErrorKind::Process,
            ExecError::Failed { .. } => ExecErrorKind::NonZeroExit,
            ExecError::Cancelled { .. } => ExecErrorKind::Cancelled,
        }
    }

    /// Condition recognized in the output of a failed command.
    pub fn recognized(&self) -> Option<Recognized> {
        match self {
            ExecError::Failed { recognized, .. } => *recognized,
            _ => None,
        }
    }
}
