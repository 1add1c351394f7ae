use std::path::Path;

use sitehook::build::{BuildEngine, BuildError, BuildSummary};

use crate::Journal;

/// Build engine that records `build` in the journal and succeeds.
pub struct RecordingEngine {
    journal: Journal,
}

impl RecordingEngine {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl BuildEngine for RecordingEngine {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn build(&self, _output: &Path, _input: &Path) -> Result<BuildSummary, BuildError> {
        self.journal.lock().unwrap().push("build".to_string());
        Ok(BuildSummary {
            files_written: Some(0),
        })
    }
}

/// Build engine that records `build` and then faults with `stderr`.
pub struct FailingEngine {
    journal: Journal,
    stderr: String,
}

impl FailingEngine {
    pub fn new(journal: Journal, stderr: &str) -> Self {
        Self {
            journal,
            stderr: stderr.to_string(),
        }
    }
}

impl BuildEngine for FailingEngine {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn build(&self, _output: &Path, _input: &Path) -> Result<BuildSummary, BuildError> {
        self.journal.lock().unwrap().push("build".to_string());
        Err(BuildError::Failed {
            code: Some(1),
            stderr: self.stderr.clone(),
        })
    }
}
