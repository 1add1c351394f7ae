// src/config/validate.rs

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::config::model::{
    BuildSection, BuildSettings, ConfigFile, PipelineSettings, RawConfigFile, RepositorySection,
    RepositorySettings, ServerSection, ServerSettings,
};
use crate::errors::{Result, SitehookError};
use crate::types::BuildEngineKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SitehookError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let server = validate_server(&raw.server)?;
        let repository = validate_repository(&raw.repository)?;
        let build = validate_build(&raw.build, &repository.working_dir)?;
        let pipeline = PipelineSettings {
            behaviour: raw.pipeline.triggered_while_running_behaviour,
        };
        Ok(ConfigFile::new_unchecked(server, repository, build, pipeline))
    }
}

fn validate_server(section: &ServerSection) -> Result<ServerSettings> {
    let listen: SocketAddr = section.listen.trim().parse().map_err(|e| {
        config_error(format!(
            "[server].listen '{}' is not a socket address: {e}",
            section.listen
        ))
    })?;

    if !section.route.starts_with('/') {
        return Err(config_error(format!(
            "[server].route must start with '/' (got '{}')",
            section.route
        )));
    }

    Ok(ServerSettings {
        listen,
        route: section.route.clone(),
    })
}

fn validate_repository(section: &RepositorySection) -> Result<RepositorySettings> {
    let executable = match section.executable.as_deref().map(str::trim) {
        Some("") => {
            return Err(config_error(
                "[repository].executable must not be empty".to_string(),
            ));
        }
        Some(exe) => PathBuf::from(exe),
        None => PathBuf::from(section.vcs.default_executable()),
    };

    if section.path.as_os_str().is_empty() {
        return Err(config_error(
            "[repository].path must not be empty".to_string(),
        ));
    }

    let timeout = parse_duration(&section.timeout)
        .map_err(|e| config_error(format!("invalid [repository].timeout: {e}")))?;
    if timeout.is_zero() {
        return Err(config_error(
            "[repository].timeout must be greater than zero".to_string(),
        ));
    }

    if section.log_limit == 0 {
        return Err(config_error(
            "[repository].log_limit must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(RepositorySettings {
        vcs: section.vcs,
        executable,
        working_dir: section.path.clone(),
        timeout,
        log_limit: section.log_limit,
        merge_stderr: section.merge_stderr,
    })
}

fn validate_build(section: &BuildSection, working_dir: &Path) -> Result<BuildSettings> {
    let input = section
        .input
        .clone()
        .unwrap_or_else(|| working_dir.to_path_buf());

    if section.output.as_os_str().is_empty() {
        return Err(config_error("[build].output must not be empty".to_string()));
    }

    match section.engine {
        BuildEngineKind::Mirror => {
            // The mirror engine clears the output before copying, so the two
            // trees must not contain each other.
            let (i, o) = (normalize(&input), normalize(&section.output));
            if o.starts_with(&i) || i.starts_with(&o) {
                return Err(config_error(format!(
                    "[build].output {:?} overlaps [build].input {:?}",
                    section.output, input
                )));
            }
        }
        BuildEngineKind::Command => {
            if section.command.first().is_none_or(|c| c.trim().is_empty()) {
                return Err(config_error(
                    "[build].command is required when engine = \"command\"".to_string(),
                ));
            }
        }
    }

    Ok(BuildSettings {
        engine: section.engine,
        input,
        output: section.output.clone(),
        command: section.command.clone(),
        exclude: section.exclude.clone(),
    })
}

/// Lexically drop `.` and fold `..` so overlap checks work on paths that may
/// not exist yet.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Parse simple duration strings like `"500ms"`, `"5s"`, `"2m"`, `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{s}'"))
}

fn config_error(msg: String) -> SitehookError {
    SitehookError::ConfigError(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_units() {
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration(" 5s "), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn rejects_missing_or_unknown_units() {
        assert!(parse_duration("5").unwrap_err().contains("missing unit"));
        assert!(parse_duration("5d").unwrap_err().contains("unsupported"));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("307445734561825861m").unwrap_err().contains("too large"));
        assert!(parse_duration("5124095576030432h").unwrap_err().contains("too large"));
    }

    #[test]
    fn normalize_folds_parent_components() {
        assert_eq!(
            normalize(Path::new("/srv/site/src/../dist/./x")),
            PathBuf::from("/srv/site/dist/x")
        );
    }
}
