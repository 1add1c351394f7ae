// tests/process_runner.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use sitehook::exec::{run_captured, CaptureStatus, CommandSpec};

fn sh(script: &str, cwd: &Path, timeout: Duration) -> CommandSpec {
    CommandSpec {
        program: PathBuf::from("sh"),
        args: vec!["-c".to_string(), script.to_string()],
        working_dir: cwd.to_path_buf(),
        timeout,
        merge_stderr: false,
    }
}

#[tokio::test]
async fn captures_stdout_of_a_clean_exit() {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();

        let capture = run_captured(&sh("echo one; echo two", dir.path(), Duration::from_secs(2))).await;

        assert_eq!(capture.text, "one\ntwo\n");
        assert_eq!(capture.status, CaptureStatus::Exited(Some(0)));
    })
    .await
}

#[tokio::test]
async fn non_zero_exit_still_returns_text() {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();

        let capture =
            run_captured(&sh("echo 'abort: no repository'; exit 255", dir.path(), Duration::from_secs(2)))
                .await;

        assert_eq!(capture.text, "abort: no repository\n");
        assert_eq!(capture.status, CaptureStatus::Exited(Some(255)));
    })
    .await
}

#[tokio::test]
async fn runs_inside_the_working_directory() {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();

        let capture = run_captured(&sh("pwd", dir.path(), Duration::from_secs(2))).await;

        assert_eq!(
            Path::new(capture.text.trim()).canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    })
    .await
}

#[tokio::test]
async fn timeout_returns_partial_output_without_blocking() {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let started = Instant::now();

        let capture = run_captured(&sh(
            "echo 'pulling from remote'; exec sleep 30",
            dir.path(),
            Duration::from_millis(300),
        ))
        .await;

        assert_eq!(capture.status, CaptureStatus::TimedOut);
        assert_eq!(capture.text, "pulling from remote\n");
        assert!(started.elapsed() < Duration::from_secs(2));
    })
    .await
}

#[tokio::test]
async fn grandchild_holding_the_pipe_does_not_extend_the_wait() {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let started = Instant::now();

        // `sleep` is a child of `sh`, keeps stdout open after `sh` is killed.
        let capture = run_captured(&sh(
            "echo partial; sleep 30; echo never",
            dir.path(),
            Duration::from_millis(300),
        ))
        .await;

        assert_eq!(capture.status, CaptureStatus::TimedOut);
        assert_eq!(capture.text, "partial\n");
        assert!(started.elapsed() < Duration::from_secs(2));
    })
    .await
}

#[tokio::test]
async fn stderr_is_excluded_unless_merged() {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let script = "echo out; echo 'abort: error: Network is unreachable' >&2; exit 255";

        let plain = run_captured(&sh(script, dir.path(), Duration::from_secs(2))).await;
        assert_eq!(plain.text, "out\n");

        let mut spec = sh(script, dir.path(), Duration::from_secs(2));
        spec.merge_stderr = true;
        let merged = run_captured(&spec).await;
        assert_eq!(merged.text, "out\nabort: error: Network is unreachable\n");
    })
    .await
}

#[tokio::test]
async fn missing_executable_degrades_to_empty_capture() {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec {
            program: PathBuf::from("/nonexistent/bin/hg"),
            args: vec!["pull".to_string()],
            working_dir: dir.path().to_path_buf(),
            timeout: Duration::from_secs(1),
            merge_stderr: false,
        };

        let capture = run_captured(&spec).await;

        assert_eq!(capture.status, CaptureStatus::SpawnFailed);
        assert!(capture.text.is_empty());
    })
    .await
}

#[tokio::test]
async fn invalid_utf8_is_replaced_not_rejected() {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();

        let capture = run_captured(&sh("printf 'caf\\351\\n'", dir.path(), Duration::from_secs(2))).await;

        assert_eq!(capture.text, "caf\u{FFFD}\n");
    })
    .await
}
