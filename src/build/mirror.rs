// src/build/mirror.rs

//! In-process engine: regenerate the output directory as a copy of the
//! working copy, without version-control metadata.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::{BuildEngine, BuildError, BuildSummary};

/// Metadata directories never published, at any depth.
const VCS_DIRS: &[&str] = &[".hg", ".git"];

#[derive(Debug, Clone, Default)]
pub struct MirrorEngine {
    /// Top-level entries of the input left out of the output.
    exclude: Vec<String>,
}

impl MirrorEngine {
    pub fn new(exclude: Vec<String>) -> Self {
        Self { exclude }
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() && VCS_DIRS.contains(&name.as_ref()) {
            return true;
        }
        entry.depth() == 1 && self.exclude.iter().any(|e| e == name.as_ref())
    }
}

impl BuildEngine for MirrorEngine {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn build(&self, output: &Path, input: &Path) -> Result<BuildSummary, BuildError> {
        let meta = fs::metadata(input).map_err(|e| BuildError::io(input, e))?;
        if !meta.is_dir() {
            return Err(BuildError::InputNotDirectory(input.to_path_buf()));
        }

        let input = fs::canonicalize(input).map_err(|e| BuildError::io(input, e))?;
        let output_abs = absolute_output(output)?;
        if output_abs.starts_with(&input) || input.starts_with(&output_abs) {
            return Err(BuildError::OverlappingPaths {
                input,
                output: output.to_path_buf(),
            });
        }

        clear_dir(&output_abs)?;

        let mut files_written = 0usize;
        let walker = WalkDir::new(&input)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !self.is_skipped(e));

        for entry in walker {
            let entry = entry?;
            let rel = entry
                .path()
                .strip_prefix(&input)
                .map_err(|e| BuildError::io(entry.path(), std::io::Error::other(e)))?;
            let dest = output_abs.join(rel);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&dest).map_err(|e| BuildError::io(&dest, e))?;
            } else if file_type.is_file() {
                fs::copy(entry.path(), &dest).map_err(|e| BuildError::io(entry.path(), e))?;
                files_written += 1;
            } else {
                debug!(path = %entry.path().display(), "skipping non-regular file");
            }
        }

        Ok(BuildSummary {
            files_written: Some(files_written),
        })
    }
}

/// Absolute form of `output`, canonical when it already exists.
fn absolute_output(output: &Path) -> Result<PathBuf, BuildError> {
    if output.exists() {
        fs::canonicalize(output).map_err(|e| BuildError::io(output, e))
    } else {
        std::path::absolute(output).map_err(|e| BuildError::io(output, e))
    }
}

/// Empty `dir`, creating it if missing. The directory itself is kept so that
/// whatever serves it keeps a stable root.
fn clear_dir(dir: &Path) -> Result<(), BuildError> {
    if !dir.exists() {
        return fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e));
    }

    for entry in fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))? {
        let entry = entry.map_err(|e| BuildError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| BuildError::io(&path, e))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| BuildError::io(&path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| BuildError::io(&path, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn copies_tree_without_vcs_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dist = tmp.path().join("dist");
        write(&src.join("index.html"), "<h1>hi</h1>");
        write(&src.join("posts/first.md"), "first");
        write(&src.join(".hg/store/data"), "secret");
        write(&src.join("drafts/wip.md"), "wip");

        let summary = MirrorEngine::new(vec!["drafts".into()])
            .build(&dist, &src)
            .unwrap();

        assert_eq!(summary.files_written, Some(2));
        assert_eq!(fs::read_to_string(dist.join("index.html")).unwrap(), "<h1>hi</h1>");
        assert_eq!(fs::read_to_string(dist.join("posts/first.md")).unwrap(), "first");
        assert!(!dist.join(".hg").exists());
        assert!(!dist.join("drafts").exists());
    }

    #[test]
    fn stale_output_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dist = tmp.path().join("dist");
        write(&src.join("a.txt"), "a");
        write(&dist.join("old/gone.txt"), "stale");
        write(&dist.join("gone.txt"), "stale");

        MirrorEngine::default().build(&dist, &src).unwrap();

        assert!(dist.join("a.txt").exists());
        assert!(!dist.join("gone.txt").exists());
        assert!(!dist.join("old").exists());
    }

    #[test]
    fn output_inside_input_is_refused_before_touching_anything() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("keep.txt"), "keep");

        let err = MirrorEngine::default()
            .build(&src.join("dist"), &src)
            .unwrap_err();

        assert!(matches!(err, BuildError::OverlappingPaths { .. }));
        assert!(src.join("keep.txt").exists());
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = MirrorEngine::default()
            .build(&tmp.path().join("dist"), &tmp.path().join("nope"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }
}
