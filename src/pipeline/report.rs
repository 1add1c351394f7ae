// src/pipeline/report.rs

use crate::build::BuildSummary;
use crate::exec::{Capture, CaptureStatus};
use crate::repo::RepoOp;

/// Status of one captured step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    pub op: RepoOp,
    pub status: CaptureStatus,
}

/// Concatenated output of the captured steps, in the order they ran.
///
/// Lives for one request only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    text: String,
    steps: Vec<StepRecord>,
}

impl PipelineReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, op: RepoOp, capture: Capture) {
        self.text.push_str(&capture.text);
        self.steps.push(StepRecord {
            op,
            status: capture.status,
        });
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// True when every step exited cleanly. Informational only.
    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.status.is_success())
    }
}

/// Everything a successful trigger hands back for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerOutcome {
    /// History captured before fetching; kept apart from the report.
    pub history: Capture,
    /// fetch text followed by update text.
    pub report: PipelineReport,
    pub build: BuildSummary,
}
