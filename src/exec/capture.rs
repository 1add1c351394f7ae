// src/exec/capture.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Always the managed working copy in this crate.
    pub working_dir: PathBuf,
    /// After this the process is considered non-responsive and killed.
    pub timeout: Duration,
    /// Append stderr text after stdout text.
    pub merge_stderr: bool,
}

impl CommandSpec {
    /// `program arg1 arg2 ...`, for logs and `--check` output.
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// How a captured process ended.
///
/// Informational only: the pipeline never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    /// Exited on its own. `None` when terminated by a signal.
    Exited(Option<i32>),
    /// Still running at the timeout; killed.
    TimedOut,
    /// Never started (missing executable, bad working directory, ...).
    SpawnFailed,
}

impl CaptureStatus {
    pub fn is_success(self) -> bool {
        matches!(self, CaptureStatus::Exited(Some(0)))
    }
}

impl fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureStatus::Exited(Some(code)) => write!(f, "exit {code}"),
            CaptureStatus::Exited(None) => f.write_str("terminated by signal"),
            CaptureStatus::TimedOut => f.write_str("timed out"),
            CaptureStatus::SpawnFailed => f.write_str("failed to start"),
        }
    }
}

/// Text a process wrote to stdout, plus how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub text: String,
    pub status: CaptureStatus,
}

impl Capture {
    pub fn new(text: impl Into<String>, status: CaptureStatus) -> Self {
        Self {
            text: text.into(),
            status,
        }
    }

    pub fn empty(status: CaptureStatus) -> Self {
        Self::new(String::new(), status)
    }
}
