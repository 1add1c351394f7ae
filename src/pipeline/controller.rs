// src/pipeline/controller.rs

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use super::guard::TriggerGuard;
use super::report::{PipelineReport, TriggerOutcome};
use super::PipelineError;
use crate::build::BuildInvoker;
use crate::config::ConfigFile;
use crate::exec::{millis, Capture, CommandRunner};
use crate::repo::{RepoOp, Repository};
use crate::types::TriggerWhileRunningBehaviour;

/// Orchestrates the view and trigger paths for one working copy.
///
/// There is no persisted notion of a run: every call builds its result from
/// scratch and drops it once rendered.
#[derive(Debug)]
pub struct PipelineController {
    repo: Repository,
    builder: BuildInvoker,
    guard: TriggerGuard,
}

impl PipelineController {
    pub fn new(
        repo: Repository,
        builder: BuildInvoker,
        behaviour: TriggerWhileRunningBehaviour,
    ) -> Self {
        Self {
            repo,
            builder,
            guard: TriggerGuard::new(behaviour),
        }
    }

    /// Wire a controller from validated config using `runner` for processes.
    pub fn from_config(cfg: &ConfigFile, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            Repository::new(cfg.repository.clone(), runner),
            BuildInvoker::from_settings(&cfg.build),
            cfg.pipeline.behaviour,
        )
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn builder(&self) -> &BuildInvoker {
        &self.builder
    }

    pub fn guard(&self) -> &TriggerGuard {
        &self.guard
    }

    /// Current history, nothing else. Never takes the trigger slot and never
    /// runs a mutating operation.
    pub async fn view(&self) -> Capture {
        self.repo.show_log().await
    }

    /// Full pipeline: history, fetch, update, build, strictly in that order.
    ///
    /// The repository steps never stop the sequence: empty or failed output
    /// is passed through for the operator to read. Only a build fault aborts,
    /// and then the fetch/update text is dropped with it.
    pub async fn trigger(&self) -> Result<TriggerOutcome, PipelineError> {
        let _slot = self.guard.acquire().await?;
        let started = Instant::now();
        info!("pipeline triggered");

        let history = self.repo.show_log().await;

        let mut report = PipelineReport::new();
        for op in [RepoOp::Fetch, RepoOp::Update] {
            let capture = self.repo.run(op).await;
            if !capture.status.is_success() {
                warn!(op = %op, status = %capture.status, "step did not exit cleanly; continuing");
            }
            report.append(op, capture);
        }

        let build = match self.builder.invoke().await {
            Ok(summary) => summary,
            Err(err) => {
                error!(error = %err, "build engine failed; discarding pipeline report");
                return Err(PipelineError::Build(err));
            }
        };

        info!(
            report_bytes = report.text().len(),
            all_steps_succeeded = report.all_succeeded(),
            elapsed_ms = millis(started.elapsed()),
            "pipeline finished"
        );

        Ok(TriggerOutcome {
            history,
            report,
            build,
        })
    }
}
