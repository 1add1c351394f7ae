// src/types.rs

//! Small enums shared between the config model and the runtime.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Behaviour when a trigger arrives while another pipeline run still owns the
/// working copy and output directory.
///
/// - `Queue`: wait for the running pipeline to finish, then run (default).
/// - `Reject`: refuse the overlapping trigger without running any step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    Queue,
    Reject,
}

impl Default for TriggerWhileRunningBehaviour {
    fn default() -> Self {
        TriggerWhileRunningBehaviour::Queue
    }
}

impl FromStr for TriggerWhileRunningBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(TriggerWhileRunningBehaviour::Queue),
            "reject" => Ok(TriggerWhileRunningBehaviour::Reject),
            other => Err(format!(
                "invalid triggered_while_running_behaviour: {other} (expected \"queue\" or \"reject\")"
            )),
        }
    }
}

/// Version-control client driving the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    /// Mercurial (`hg`).
    Hg,
    /// Git.
    Git,
}

impl Default for VcsKind {
    fn default() -> Self {
        VcsKind::Hg
    }
}

impl VcsKind {
    /// Executable looked up on `PATH` when `[repository].executable` is unset.
    pub fn default_executable(self) -> &'static str {
        match self {
            VcsKind::Hg => "hg",
            VcsKind::Git => "git",
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsKind::Hg => f.write_str("hg"),
            VcsKind::Git => f.write_str("git"),
        }
    }
}

/// Which build engine regenerates the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildEngineKind {
    /// In-process mirror of the working copy into the output directory.
    Mirror,
    /// External generator command run to completion.
    Command,
}

impl Default for BuildEngineKind {
    fn default() -> Self {
        BuildEngineKind::Mirror
    }
}
