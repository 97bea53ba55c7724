// ABOUTME: Library root for kubeship - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod kubectl;
pub mod output;
pub mod render;
pub mod types;
