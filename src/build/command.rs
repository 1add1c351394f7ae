// src/build/command.rs

//! External site generator run to completion, with no timeout.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::{BuildEngine, BuildError, BuildSummary};

/// Runs `command[0] command[1..]` with `{input}` / `{output}` substituted,
/// from inside the input directory.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    command: Vec<String>,
}

impl CommandEngine {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// The argument vector for one build, placeholders resolved.
    pub fn resolve(&self, output: &Path, input: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.command
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect()
    }
}

impl BuildEngine for CommandEngine {
    fn name(&self) -> &'static str {
        "command"
    }

    fn build(&self, output: &Path, input: &Path) -> Result<BuildSummary, BuildError> {
        let argv = self.resolve(output, input);
        let Some((program, args)) = argv.split_first() else {
            return Err(BuildError::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            });
        };

        info!(cmd = %argv.join(" "), "running build command");

        let out = Command::new(program)
            .args(args)
            .current_dir(input)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| BuildError::Spawn {
                program: program.clone(),
                source,
            })?;

        for line in String::from_utf8_lossy(&out.stdout).lines() {
            debug!(cmd = %program, "build stdout: {}", line);
        }

        if !out.status.success() {
            return Err(BuildError::Failed {
                code: out.status.code(),
                stderr: String::from_utf8_lossy(&out.stderr).trim_end().to_string(),
            });
        }

        Ok(BuildSummary::default())
    }
}
