// src/pipeline/mod.rs

//! Pipeline orchestration.
//!
//! - [`controller`] runs the view path (history only) and the trigger path
//!   (history, fetch, update, build).
//! - [`guard`] serializes or rejects overlapping triggers.
//! - [`report`] holds the request-scoped results handed to the view layer.

pub mod controller;
pub mod guard;
pub mod report;

use thiserror::Error;

use crate::build::BuildError;

pub use controller::PipelineController;
pub use guard::TriggerGuard;
pub use report::{PipelineReport, StepRecord, TriggerOutcome};

/// Why a trigger produced no report.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Another trigger holds the working copy and the guard is in reject mode.
    #[error("a pipeline run is already in progress")]
    Busy,

    /// The build engine faulted; fetch/update text is discarded.
    #[error("build failed: {0}")]
    Build(#[from] BuildError),
}
