#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use sitehook::build::{BuildEngine, BuildInvoker};
use sitehook::config::{
    BuildSection, ConfigFile, PipelineSection, RawConfigFile, RepositorySection, ServerSection,
};
use sitehook::exec::CommandRunner;
use sitehook::pipeline::PipelineController;
use sitehook::repo::Repository;
use sitehook::types::{BuildEngineKind, TriggerWhileRunningBehaviour, VcsKind};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    /// Minimal config: `repo` as working copy and build input, `output` as
    /// build output, everything else default.
    pub fn new(repo: &Path, output: &Path) -> Self {
        Self {
            config: RawConfigFile {
                server: ServerSection::default(),
                repository: RepositorySection {
                    vcs: VcsKind::Hg,
                    executable: None,
                    path: repo.to_path_buf(),
                    timeout: "5s".to_string(),
                    log_limit: 15,
                    merge_stderr: false,
                },
                build: BuildSection {
                    engine: BuildEngineKind::Mirror,
                    input: None,
                    output: output.to_path_buf(),
                    command: Vec::new(),
                    exclude: Vec::new(),
                },
                pipeline: PipelineSection::default(),
            },
        }
    }

    pub fn vcs(mut self, vcs: VcsKind) -> Self {
        self.config.repository.vcs = vcs;
        self
    }

    pub fn executable(mut self, exe: impl AsRef<Path>) -> Self {
        self.config.repository.executable = Some(exe.as_ref().display().to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.config.repository.timeout = timeout.to_string();
        self
    }

    pub fn log_limit(mut self, limit: usize) -> Self {
        self.config.repository.log_limit = limit;
        self
    }

    pub fn merge_stderr(mut self, val: bool) -> Self {
        self.config.repository.merge_stderr = val;
        self
    }

    pub fn behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.pipeline.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn build_command(mut self, argv: &[&str]) -> Self {
        self.config.build.engine = BuildEngineKind::Command;
        self.config.build.command = argv.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn exclude(mut self, name: &str) -> Self {
        self.config.build.exclude.push(name.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Controller over `cfg`'s repository settings with the given runner and
/// build engine, using the config's behaviour and build paths.
pub fn controller_with(
    cfg: &ConfigFile,
    runner: Arc<dyn CommandRunner>,
    engine: Arc<dyn BuildEngine>,
) -> PipelineController {
    PipelineController::new(
        Repository::new(cfg.repository.clone(), runner),
        BuildInvoker::new(engine, cfg.build.input.clone(), cfg.build.output.clone()),
        cfg.pipeline.behaviour,
    )
}
