// src/config/model.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::{BuildEngineKind, TriggerWhileRunningBehaviour, VcsKind};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [server]
/// listen = "127.0.0.1:8080"
/// route = "/"
///
/// [repository]
/// vcs = "hg"
/// executable = "/usr/bin/hg"
/// path = "/srv/www/site/src"
/// timeout = "5s"
/// log_limit = 15
///
/// [build]
/// engine = "mirror"
/// output = "/srv/www/site/dist"
///
/// [pipeline]
/// triggered_while_running_behaviour = "queue"
/// ```
///
/// `[server]` and `[pipeline]` are optional; `[repository]` and `[build]`
/// are required because their paths have no sensible default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: ServerSection,

    pub repository: RepositorySection,

    pub build: BuildSection,

    #[serde(default)]
    pub pipeline: PipelineSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Socket address to bind, e.g. `"0.0.0.0:8080"`.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// The single route serving GET (view) and POST (trigger).
    #[serde(default = "default_route")]
    pub route: String,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_route() -> String {
    "/".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            route: default_route(),
        }
    }
}

/// `[repository]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySection {
    /// `"hg"` (default) or `"git"`.
    #[serde(default)]
    pub vcs: VcsKind,

    /// Version-control executable. Falls back to `hg` / `git` on `PATH`.
    #[serde(default)]
    pub executable: Option<String>,

    /// Working copy location; every command runs with this as its cwd.
    pub path: PathBuf,

    /// Per-command wall-clock bound, e.g. `"5s"` or `"500ms"`.
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Maximum number of history entries shown.
    #[serde(default = "default_log_limit")]
    pub log_limit: usize,

    /// Append the tool's stderr after its stdout in captured text.
    #[serde(default)]
    pub merge_stderr: bool,
}

fn default_timeout() -> String {
    "5s".to_string()
}

fn default_log_limit() -> usize {
    15
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// `"mirror"` (default) or `"command"`.
    #[serde(default)]
    pub engine: BuildEngineKind,

    /// Directory the engine reads. Defaults to `[repository].path`.
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Directory the engine writes.
    pub output: PathBuf,

    /// Generator command line for `engine = "command"`. `{input}` and
    /// `{output}` are substituted in every argument.
    #[serde(default)]
    pub command: Vec<String>,

    /// Top-level names in the input the mirror engine leaves out.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    #[serde(default)]
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,
}

/// Validated configuration, fixed for the lifetime of the process.
///
/// Build one with `ConfigFile::try_from(raw)` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub repository: RepositorySettings,
    pub build: BuildSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub listen: SocketAddr,
    pub route: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySettings {
    pub vcs: VcsKind,
    pub executable: PathBuf,
    pub working_dir: PathBuf,
    pub timeout: Duration,
    pub log_limit: usize,
    pub merge_stderr: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub engine: BuildEngineKind,
    pub input: PathBuf,
    pub output: PathBuf,
    pub command: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub behaviour: TriggerWhileRunningBehaviour,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        server: ServerSettings,
        repository: RepositorySettings,
        build: BuildSettings,
        pipeline: PipelineSettings,
    ) -> Self {
        Self {
            server,
            repository,
            build,
            pipeline,
        }
    }
}
