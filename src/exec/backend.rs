// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The repository client talks to a `CommandRunner` instead of spawning
//! processes itself. Production code uses [`RealCommandRunner`]; tests can
//! provide an implementation that records invocations and returns canned
//! text.

use std::future::Future;
use std::pin::Pin;

use super::capture::{Capture, CommandSpec};
use super::runner::run_captured;

/// Trait abstracting how a single command is run and captured.
///
/// Implementations never fail: whatever went wrong is reflected in the
/// returned [`Capture`] (empty text, non-success status).
pub trait CommandRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Capture> + Send + 'a>>;
}

/// Real runner used in production: spawns an OS process per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Capture> + Send + 'a>> {
        Box::pin(run_captured(spec))
    }
}
