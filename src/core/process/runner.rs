// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, cwd, stdio
//!              |
//!              v
//!          spawn()
//!              |
//!              v
//!   run_child: wait | cancel | deadline
//!              |
//!              v
//!    validate exit_code
//!    (skip if ALLOW_FAILURE)
//!              |
//!              v
//!       ProcessOutput
//!    { exit_code, stdout, stderr }
//! ```

use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Returns the display name for this process.
    pub(super) fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging and errors).
    #[must_use]
    pub fn command_line(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = self.display_name();
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if spawning fails, the deadline passes, or the
    /// process exits non-zero without `ALLOW_FAILURE`.
    pub async fn run(self) -> Result<ProcessOutput, ProcessError> {
        self.run_with_cancellation(CancellationToken::new()).await
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// When the token is cancelled the child is killed and
    /// `ProcessError::Interrupted` is returned.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if spawning fails, the run is cancelled, the
    /// deadline passes, or the process exits non-zero without `ALLOW_FAILURE`.
    pub async fn run_with_cancellation(
        self,
        token: CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_cancelled() {
            return Err(ProcessError::Interrupted { command: cmd_line });
        }

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), cmd = %cmd_line, "exec");
        } else {
            debug!(cmd = %cmd_line, "exec");
        }

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|error| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                error,
            })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self
            .run_child(&name, &cmd_line, &mut child, &token)
            .await?;

        if output.is_interrupted() {
            return Err(ProcessError::Interrupted { command: cmd_line });
        }

        if !output.success() && !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        command.stdin(Stdio::null());
        command.stdout(Self::stdio_from_flags(self.stdout_config()));
        command.stderr(Self::stdio_from_flags(self.stderr_config()));

        // Dropping the child (task aborted) must not leave svn running
        command.kill_on_drop(true);

        command
    }

    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
            Stdio::piped()
        } else {
            Stdio::null()
        }
    }
}
