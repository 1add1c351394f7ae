// src/exec/runner.rs

//! Spawn one process, wait at most its timeout, return its stdout.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::capture::{Capture, CaptureStatus, CommandSpec};
use super::millis;

/// How long the output readers get to finish once the child has exited or
/// been killed. A grandchild that inherited the pipe can keep it open
/// indefinitely; past this bound we keep what was read so far.
pub const DRAIN_GRACE: Duration = Duration::from_millis(250);

type Sink = Arc<Mutex<Vec<u8>>>;

/// Run `spec` and capture its standard output.
///
/// - Never returns an error. A non-zero exit keeps its text, a timeout keeps
///   whatever was written before the kill, a spawn failure yields empty text.
/// - The child is always reaped before returning (`kill_on_drop` covers the
///   paths where this future itself is dropped).
/// - stderr is always drained; its lines are logged and, with
///   `merge_stderr`, appended after stdout.
pub async fn run_captured(spec: &CommandSpec) -> Capture {
    let started = Instant::now();
    let line = spec.display_line();
    debug!(
        cmd = %line,
        cwd = %spec.working_dir.display(),
        timeout_ms = millis(spec.timeout),
        "starting capture process"
    );

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            error!(
                cmd = %line,
                cwd = %spec.working_dir.display(),
                error = %err,
                "failed to spawn process"
            );
            return Capture::empty(CaptureStatus::SpawnFailed);
        }
    };

    let stdout_sink: Sink = Arc::default();
    let stderr_sink: Sink = Arc::default();
    let stdout_reader = child
        .stdout
        .take()
        .map(|out| spawn_collector(out, Arc::clone(&stdout_sink)));
    let stderr_reader = child
        .stderr
        .take()
        .map(|err| spawn_collector(err, Arc::clone(&stderr_sink)));

    let status = match timeout(spec.timeout, child.wait()).await {
        Ok(Ok(exit)) => CaptureStatus::Exited(exit.code()),
        Ok(Err(err)) => {
            warn!(cmd = %line, error = %err, "failed waiting for process");
            CaptureStatus::Exited(None)
        }
        Err(_) => {
            warn!(
                cmd = %line,
                timeout_ms = millis(spec.timeout),
                "process did not finish within timeout; killing"
            );
            // `kill` also waits, so the handle is reaped here.
            if let Err(err) = child.kill().await {
                warn!(cmd = %line, error = %err, "failed to kill timed-out process");
            }
            CaptureStatus::TimedOut
        }
    };

    tokio::join!(drain(stdout_reader), drain(stderr_reader));

    let stdout = std::mem::take(&mut *stdout_sink.lock().await);
    let stderr = std::mem::take(&mut *stderr_sink.lock().await);

    let mut text = String::from_utf8_lossy(&stdout).into_owned();
    let stderr_text = String::from_utf8_lossy(&stderr);
    for err_line in stderr_text.lines().filter(|l| !l.trim().is_empty()) {
        warn!(cmd = %line, "stderr: {}", err_line);
    }
    if spec.merge_stderr {
        text.push_str(&stderr_text);
    }

    info!(
        cmd = %line,
        status = %status,
        stdout_bytes = stdout.len(),
        elapsed_ms = millis(started.elapsed()),
        "capture process finished"
    );

    Capture { text, status }
}

/// Copy everything from `reader` into `sink` until EOF or a read error.
///
/// Writing into a shared sink (rather than returning the buffer) means a
/// reader aborted after [`DRAIN_GRACE`] still leaves its partial output behind.
fn spawn_collector<R>(mut reader: R, sink: Sink) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = [0u8; 4096];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => sink.lock().await.extend_from_slice(&chunk[..n]),
                Err(err) => {
                    debug!(error = %err, "stopped reading process output");
                    break;
                }
            }
        }
    })
}

async fn drain(reader: Option<JoinHandle<()>>) {
    let Some(mut handle) = reader else {
        return;
    };
    if timeout(DRAIN_GRACE, &mut handle).await.is_err() {
        debug!("output pipe still open after drain grace; abandoning reader");
        handle.abort();
    }
}
