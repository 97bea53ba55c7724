// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => self.emit_stdout("success", message, None),
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit_stderr("warning", message, None),
        }
    }

    /// Print an error message, tagged with the run outcome in JSON mode.
    pub fn error(&self, message: &str, outcome: Option<&str>) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => self.emit_stderr("error", message, outcome),
        }
    }

    /// Print diagnostic detail such as job logs (suppressed in quiet mode).
    pub fn detail(&self, title: &str, body: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("{title}:\n{body}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit_stderr("detail", &format!("{title}:\n{body}"), None),
        }
    }

    fn event<'a>(&self, event: &'a str, message: &'a str, outcome: Option<&'a str>) -> JsonEvent<'a> {
        JsonEvent {
            event,
            message,
            outcome,
            duration_secs: self.duration(),
        }
    }

    fn emit_stdout(&self, event: &str, message: &str, outcome: Option<&str>) {
        if let Ok(json) = serde_json::to_string(&self.event(event, message, outcome)) {
            println!("{json}");
        }
    }

    fn emit_stderr(&self, event: &str, message: &str, outcome: Option<&str>) {
        if let Ok(json) = serde_json::to_string(&self.event(event, message, outcome)) {
            eprintln!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
