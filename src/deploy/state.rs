// ABOUTME: Release state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce the phase order at compile time.

/// Manifests rendered into the scratch directory.
/// Available actions: `validate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Rendered;

/// Every manifest passed the server-side dry run.
/// Available actions: `await_scale_down()`, `apply()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Validated;

/// Every manifest applied to the cluster.
/// Available actions: `await_rollouts()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Applied;

/// All rollouts reported complete.
/// Available actions: `await_jobs()`
#[derive(Debug, Clone, Copy, Default)]
pub struct RolledOut;

/// Jobs finished within their budget.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Completed;
