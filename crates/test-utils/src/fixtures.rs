//! Real-process fixtures: a shell script standing in for `hg`.
//!
//! The script reads history from `./commits` (one summary per line, oldest
//! first) in its working directory and appends every verb it is asked to run
//! to a `calls` file next to itself, so tests can see exactly which
//! operations reached the process boundary.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// What the fake `hg pull` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullBehaviour {
    /// Remote has nothing new.
    NoChanges,
    /// Network down: diagnostic on stderr, exit 255.
    Unreachable,
    /// Prints one line, then never finishes.
    Hang,
}

pub const NO_CHANGES_TEXT: &str = "pulling from https://example.invalid/site\nsearching for changes\nno changes found\n";
pub const UPDATE_TEXT: &str = "0 files updated, 0 files merged, 0 files removed, 0 files unresolved\n";
pub const UNREACHABLE_STDERR: &str = "abort: error: Network is unreachable";

/// Handle on a written fake `hg`.
#[derive(Debug, Clone)]
pub struct FakeHg {
    pub script: PathBuf,
    calls: PathBuf,
}

impl FakeHg {
    /// Verbs the script was invoked with, in order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.calls)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Write the fake `hg` into `dir` (not the working copy).
pub fn write_fake_hg(dir: &Path, pull: PullBehaviour) -> io::Result<FakeHg> {
    let script = dir.join("fake-hg");
    let calls = dir.join("calls");

    let pull_body = match pull {
        PullBehaviour::NoChanges => {
            "echo 'pulling from https://example.invalid/site'\n    echo 'searching for changes'\n    echo 'no changes found'".to_string()
        }
        PullBehaviour::Unreachable => format!(
            "echo 'pulling from https://example.invalid/site'\n    echo '{UNREACHABLE_STDERR}' >&2\n    exit 255"
        ),
        PullBehaviour::Hang => {
            "echo 'pulling from https://example.invalid/site'\n    exec sleep 30".to_string()
        }
    };

    let body = format!(
        r#"#!/bin/sh
case "$1" in
  log)
    echo log >> '{calls}'
    tail -n "$4" commits | while IFS= read -r msg; do
      printf 'o  summary: %s\n|\n' "$msg"
    done
    ;;
  pull)
    echo pull >> '{calls}'
    {pull_body}
    ;;
  update)
    echo update >> '{calls}'
    printf '{update}'
    ;;
  *)
    echo "hg: unknown command '$1'" >&2
    exit 255
    ;;
esac
"#,
        calls = calls.display(),
        pull_body = pull_body,
        update = UPDATE_TEXT.replace('\n', "\\n"),
    );

    fs::write(&script, body)?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
    wait_until_executable(&script)?;

    Ok(FakeHg { script, calls })
}

/// Write `n` commits (`commit 1` .. `commit n`) as the working copy history.
pub fn write_commits(repo: &Path, n: usize) -> io::Result<()> {
    let mut history = String::new();
    for i in 1..=n {
        history.push_str(&format!("commit {i}\n"));
    }
    fs::write(repo.join("commits"), history)
}

/// Count entries in the fake log output.
pub fn count_entries(log: &str) -> usize {
    log.lines().filter(|l| l.starts_with("o  summary:")).count()
}

/// Another test thread forking while our write handle was open can leave the
/// script briefly "text file busy"; probe until it runs.
fn wait_until_executable(script: &Path) -> io::Result<()> {
    const ETXTBSY: i32 = 26;
    let mut last = None;
    for _ in 0..50 {
        match Command::new(script)
            .arg("--probe")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => return Ok(()),
            Err(e) if e.raw_os_error() == Some(ETXTBSY) => {
                last = Some(e);
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => return Err(e),
        }
    }
    Err(last.unwrap_or_else(|| io::Error::other("script never became executable")))
}
