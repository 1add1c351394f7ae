// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs external commands with `tokio::process::Command` under a hard
//! wall-clock bound and hands their standard output back as text.
//!
//! - [`capture`] holds the command/capture data types.
//! - [`runner`] spawns, waits, kills and drains a single process.
//! - [`backend`] provides the `CommandRunner` trait and the production
//!   `RealCommandRunner`; tests swap in a fake that never spawns anything.

pub mod backend;
pub mod capture;
pub mod runner;

pub use backend::{CommandRunner, RealCommandRunner};
pub use capture::{Capture, CaptureStatus, CommandSpec};
pub use runner::run_captured;

use std::time::Duration;

/// Whole milliseconds for log fields, saturating at `u64::MAX`.
pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
