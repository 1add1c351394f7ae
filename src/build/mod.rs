// src/build/mod.rs

//! Build invocation: regenerate the output directory from the working copy.
//!
//! Unlike repository operations, the build engine is called directly and its
//! failures are load-bearing: a [`BuildError`] aborts the whole trigger.
//!
//! - [`mirror`] is the in-process engine (copy the tree, minus VCS metadata).
//! - [`command`] drives an external site generator to completion.

pub mod command;
pub mod mirror;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::config::BuildSettings;
use crate::exec::millis;
use crate::types::BuildEngineKind;

pub use command::CommandEngine;
pub use mirror::MirrorEngine;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("walking input tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("input {0:?} is not a directory")]
    InputNotDirectory(PathBuf),

    #[error("output {output:?} overlaps input {input:?}")]
    OverlappingPaths { input: PathBuf, output: PathBuf },

    #[error("failed to start build command '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("build command exited with {}: {stderr}", describe_exit(.code))]
    Failed { code: Option<i32>, stderr: String },

    #[error("build task did not complete: {0}")]
    Join(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "a signal".to_string(),
    }
}

impl BuildError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What a successful build reports back (for logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildSummary {
    /// Number of files written, when the engine knows it.
    pub files_written: Option<usize>,
}

/// A site generator: reads `input`, writes `output`, blocks until done.
pub trait BuildEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn build(&self, output: &Path, input: &Path) -> Result<BuildSummary, BuildError>;
}

/// Construct the engine selected in `[build]`.
pub fn engine_from_settings(settings: &BuildSettings) -> Arc<dyn BuildEngine> {
    match settings.engine {
        BuildEngineKind::Mirror => Arc::new(MirrorEngine::new(settings.exclude.clone())),
        BuildEngineKind::Command => Arc::new(CommandEngine::new(settings.command.clone())),
    }
}

/// Binds an engine to the fixed input and output directories.
#[derive(Clone)]
pub struct BuildInvoker {
    engine: Arc<dyn BuildEngine>,
    input: PathBuf,
    output: PathBuf,
}

impl std::fmt::Debug for BuildInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildInvoker")
            .field("engine", &self.engine.name())
            .field("input", &self.input)
            .field("output", &self.output)
            .finish()
    }
}

impl BuildInvoker {
    pub fn new(engine: Arc<dyn BuildEngine>, input: PathBuf, output: PathBuf) -> Self {
        Self {
            engine,
            input,
            output,
        }
    }

    pub fn from_settings(settings: &BuildSettings) -> Self {
        Self::new(
            engine_from_settings(settings),
            settings.input.clone(),
            settings.output.clone(),
        )
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run the engine once and wait for it, however long it takes.
    ///
    /// The engine is synchronous, so it runs on the blocking pool.
    pub async fn invoke(&self) -> Result<BuildSummary, BuildError> {
        let engine = Arc::clone(&self.engine);
        let input = self.input.clone();
        let output = self.output.clone();

        info!(
            engine = engine.name(),
            input = %input.display(),
            output = %output.display(),
            "invoking build engine"
        );
        let started = Instant::now();

        let summary = tokio::task::spawn_blocking(move || engine.build(&output, &input))
            .await
            .map_err(|e| BuildError::Join(e.to_string()))??;

        info!(
            engine = self.engine.name(),
            files_written = ?summary.files_written,
            elapsed_ms = millis(started.elapsed()),
            "build engine finished"
        );
        Ok(summary)
    }
}
