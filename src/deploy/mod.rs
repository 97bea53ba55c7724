// ABOUTME: Deploy orchestration using the type state pattern.
// ABOUTME: Validation gate, readiness waits, and the phase sequence driving them.

mod error;
mod gate;
mod jobs;
mod outcome;
mod readiness;
mod release;
mod run;
mod state;
mod transitions;

pub use error::{DeployError, DeployErrorKind};
pub use gate::{DiffReport, diff_all, dry_run_all};
pub use jobs::{TimedOutJob, wait_for_jobs};
pub use outcome::RunOutcome;
pub use readiness::{Condition, ReadinessQuery, ReadinessWaiter, WaitOutcome};
pub use release::Release;
pub use run::{Orchestrator, RunOptions};
pub use state::{Applied, Completed, Rendered, RolledOut, Validated};
