// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted kubectl runner and fake kubectl binaries for integration tests.

use std::collections::VecDeque;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Once;

use async_trait::async_trait;
use kubeship::kubectl::{CommandOutput, CommandRunner, ExecError};
use parking_lot::Mutex;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("kubeship=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Write an executable shell script standing in for kubectl.
#[allow(dead_code)]
pub fn fake_kubectl(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("kubectl");
    fs::write(&path, script).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

#[derive(Debug, Clone)]
struct Reply {
    code: i32,
    stdout: String,
    stderr: String,
}

struct Rule {
    pattern: String,
    replies: VecDeque<Reply>,
}

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    /// Arguments joined with spaces.
    pub line: String,
    /// Contents of the `-f` file at call time, if any.
    pub file: Option<(PathBuf, String)>,
}

/// Answers kubectl commands from a script instead of a cluster.
///
/// The first rule whose pattern appears in the joined argument line wins.
/// Each rule replays its replies in order and then repeats the last one.
/// Commands matching no rule succeed with empty output.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reply for commands containing `pattern`.
    pub fn on(self, pattern: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        let reply = Reply {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        };
        {
            let mut rules = self.rules.lock();
            match rules.iter_mut().find(|rule| rule.pattern == pattern) {
                Some(rule) => rule.replies.push_back(reply),
                None => rules.push(Rule {
                    pattern: pattern.to_string(),
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Argument lines of every call, in order.
    pub fn lines(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.line.clone()).collect()
    }

    /// Number of calls whose argument line contains `pattern`.
    pub fn count(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.line.contains(pattern))
            .count()
    }

    /// Position of the first call containing `pattern`.
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.calls.lock().iter().position(|c| c.line.contains(pattern))
    }

    fn reply_for(&self, line: &str) -> Reply {
        let mut rules = self.rules.lock();
        let Some(rule) = rules.iter_mut().find(|rule| line.contains(&rule.pattern)) else {
            return Reply {
                code: 0,
                stdout: String::new(),
                stderr: String::new(),
            };
        };

        if rule.replies.len() > 1 {
            rule.replies.pop_front().unwrap()
        } else {
            rule.replies[0].clone()
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn capture(&self, args: &[String]) -> Result<CommandOutput, ExecError> {
        let line = args.join(" ");
        let file = args
            .iter()
            .position(|a| a == "-f")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
            .map(|path| {
                let content = fs::read_to_string(&path).unwrap_or_default();
                (path, content)
            });

        self.calls.lock().push(Call {
            line: line.clone(),
            file,
        });

        let reply = self.reply_for(&line);
        Ok(CommandOutput::new(
            format!("kubectl {line}"),
            Some(reply.code),
            reply.stdout,
            reply.stderr,
        ))
    }
}
