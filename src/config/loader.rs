// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, rebase relative directories onto the
/// config file's directory, and validate.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let mut raw_config = load_from_path(path)?;
    raw_config.rebase_paths(&config_root_dir(path));
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Sitehook.toml")
}

/// Directory that relative paths in a config file are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "deploy/Sitehook.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Sitehook.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

impl RawConfigFile {
    /// Make the repository and build directories absolute relative to `root`.
    ///
    /// The executable is left alone so that bare names keep resolving via `PATH`.
    pub fn rebase_paths(&mut self, root: &Path) {
        rebase(&mut self.repository.path, root);
        rebase(&mut self.build.output, root);
        if let Some(input) = self.build.input.as_mut() {
            rebase(input, root);
        }
    }
}

fn rebase(path: &mut PathBuf, root: &Path) {
    if path.is_relative() {
        *path = root.join(&*path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_resolves_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config_root_dir(Path::new("Sitehook.toml")), cwd);
        assert_eq!(
            config_root_dir(Path::new("deploy/Sitehook.toml")),
            PathBuf::from("deploy")
        );
    }

    #[test]
    fn absolute_paths_are_not_rebased() {
        let mut p = PathBuf::from("/srv/site/src");
        rebase(&mut p, Path::new("/etc/sitehook"));
        assert_eq!(p, PathBuf::from("/srv/site/src"));

        let mut p = PathBuf::from("src");
        rebase(&mut p, Path::new("/etc/sitehook"));
        assert_eq!(p, PathBuf::from("/etc/sitehook/src"));
    }
}
