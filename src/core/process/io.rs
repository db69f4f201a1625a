// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks (each returns its captured text)
//!   select: wait | token.cancelled() | deadline
//!   --> ProcessOutput { stdout, stderr, exit_code, interrupted }
//! ```

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::ProcessError;

/// Spawns a reader task for one stream if its flags need the lines.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    let name = process_name.to_string();
    stream.map(|stream| {
        tokio::spawn(async move { read_stream(stream, flags, &name, stream_name).await })
    })
}

/// Reads a stream to the end, forwarding and/or keeping each line.
///
/// Lines are split on raw bytes and decoded lossily: svn prints file names
/// in the console code page, and the pipe must be drained to EOF or the
/// child dies of SIGPIPE.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &str,
) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut kept = String::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let raw = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
                let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
                let line = String::from_utf8_lossy(raw);
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %process_name, stream = %stream_name, line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    if !kept.is_empty() {
                        kept.push('\n');
                    }
                    kept.push_str(&line);
                }
            }
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }

    kept
}

/// Waits for a reader task, returning what it kept.
async fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

/// Resolves after `timeout`, or never when no deadline is set.
async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending::<()>().await,
    }
}

impl ProcessBuilder {
    /// Runs the child process, handling I/O streaming, cancellation and the
    /// deadline.
    pub(super) async fn run_child(
        &self,
        name: &str,
        cmd_line: &str,
        child: &mut Child,
        token: &CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        let stdout_handle = spawn_reader(child.stdout.take(), self.stdout_config(), name, "stdout");
        let stderr_handle = spawn_reader(child.stderr.take(), self.stderr_config(), name, "stderr");

        let wait_failed = |error| ProcessError::WaitFailed {
            command: cmd_line.to_string(),
            error,
        };

        let (status, interrupted) = tokio::select! {
            status = child.wait() => (status.map_err(wait_failed)?, false),
            () = token.cancelled() => {
                warn!(process = %name, "cancellation requested, terminating process");
                child.kill().await.ok();
                (child.wait().await.map_err(wait_failed)?, true)
            }
            () = deadline(self.timeout_duration()) => {
                let timeout = self.timeout_duration().unwrap_or_default();
                warn!(process = %name, timeout = ?timeout, "process timed out");
                child.kill().await.ok();
                return Err(ProcessError::Timeout {
                    command: cmd_line.to_string(),
                    timeout_secs: timeout.as_secs(),
                });
            }
        };

        let stdout = join_reader(stdout_handle).await;
        let stderr = join_reader(stderr_handle).await;

        Ok(ProcessOutput::new(
            status.code().unwrap_or(-1),
            stdout,
            stderr,
            interrupted,
        ))
    }
}
