// ABOUTME: Captured result of a kubectl invocation.
// ABOUTME: Classifies well-known failure conditions once, at the process boundary.

use super::ExecError;

/// A failure condition recognized in kubectl output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognized {
    /// The queried resource does not exist.
    NotFound,
}

impl Recognized {
    /// Classify the output of a failed command.
    pub fn detect(stdout: &str, stderr: &str) -> Option<Self> {
        // kubectl reports `Error from server (NotFound): deployments.apps "api" not found`
        (stderr.contains("NotFound") || stdout.contains("NotFound")).then_some(Recognized::NotFound)
    }
}

/// Exit status and captured streams of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Human-readable command line, for logs and errors.
    pub command: String,
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Set only for unsuccessful commands.
    pub recognized: Option<Recognized>,
}

impl CommandOutput {
    pub fn new(command: impl Into<String>, code: Option<i32>, stdout: String, stderr: String) -> Self {
        let recognized = if code == Some(0) {
            None
        } else {
            Recognized::detect(&stdout, &stderr)
        };
        Self {
            command: command.into(),
            code,
            stdout,
            stderr,
            recognized,
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn is_not_found(&self) -> bool {
        self.recognized == Some(Recognized::NotFound)
    }

    /// Stdout with surrounding whitespace and jsonpath single quotes removed.
    pub fn value(&self) -> &str {
        self.stdout.trim().trim_matches('\'').trim()
    }

    /// Convert an unsuccessful output into the matching error.
    pub fn into_failure(self) -> ExecError {
        ExecError::Failed {
            command: self.command,
            code: self.code,
            stderr: self.stderr,
            recognized: self.recognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_detected_from_stderr() {
        let out = CommandOutput::new(
            "kubectl get deployment api",
            Some(1),
            String::new(),
            "Error from server (NotFound): deployments.apps \"api\" not found\n".to_string(),
        );
        assert!(out.is_not_found());
    }

    #[test]
    fn other_failures_are_not_classified() {
        let out = CommandOutput::new(
            "kubectl get deployment api",
            Some(1),
            String::new(),
            "Unable to connect to the server: dial tcp: i/o timeout".to_string(),
        );
        assert_eq!(out.recognized, None);
    }

    #[test]
    fn successful_output_is_never_classified() {
        let out = CommandOutput::new("kubectl logs", Some(0), "file not found".to_string(), String::new());
        assert!(!out.is_not_found());
    }

    #[test]
    fn value_strips_jsonpath_quotes() {
        let out = CommandOutput::new("kubectl get", Some(0), "'3'\n".to_string(), String::new());
        assert_eq!(out.value(), "3");
    }
}
