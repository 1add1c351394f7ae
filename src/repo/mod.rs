// src/repo/mod.rs

//! Repository client: the three fixed operations on one working copy.
//!
//! Every call goes through a [`CommandRunner`] with the shared working
//! directory and timeout. Tool failures (auth, network, conflicts) are not
//! classified here; they show up only as captured text.

pub mod ops;

use std::sync::Arc;

use tracing::debug;

use crate::config::RepositorySettings;
use crate::exec::{Capture, CommandRunner, CommandSpec};

pub use ops::RepoOp;

pub struct Repository {
    settings: RepositorySettings,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Repository {
    pub fn new(settings: RepositorySettings, runner: Arc<dyn CommandRunner>) -> Self {
        Self { settings, runner }
    }

    /// The exact invocation used for `op`.
    pub fn command_for(&self, op: RepoOp) -> CommandSpec {
        CommandSpec {
            program: self.settings.executable.clone(),
            args: op.args(self.settings.vcs, self.settings.log_limit),
            working_dir: self.settings.working_dir.clone(),
            timeout: self.settings.timeout,
            merge_stderr: self.settings.merge_stderr,
        }
    }

    pub async fn run(&self, op: RepoOp) -> Capture {
        let spec = self.command_for(op);
        debug!(op = %op, cmd = %spec.display_line(), "running repository operation");
        self.runner.run(&spec).await
    }

    pub async fn show_log(&self) -> Capture {
        self.run(RepoOp::ShowLog).await
    }
}
