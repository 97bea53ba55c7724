// ABOUTME: Boundary to the kubectl command-line tool.
// ABOUTME: Exposes the CommandRunner seam, its process implementation, and argument builders.

pub mod args;
mod error;
mod executor;
mod output;

pub use error::{ExecError, ExecErrorKind};
pub use executor::{CommandRunner, DEFAULT_PROGRAM, Kubectl};
pub use output::{CommandOutput, Recognized};
