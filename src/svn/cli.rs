// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! svn command-line executor.
//!
//! ```text
//! SvnCli::new("svn")
//!   .with_timeout()  .with_cancel_token()
//!   execute(cwd, ["info", ...])
//!     --> ProcessBuilder svn info --non-interactive
//!         ALLOW_FAILURE, stderr always kept
//!     --> exit 0: CommandOutput
//!         else  : SvnError::CommandFailed { stderr }
//! ```

use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{Capture, CommandOutput, SvnExecutor};
use crate::core::process::builder::{ProcessBuilder, ProcessFlags, StreamFlags};
use crate::error::{SvnError, SvnResult};

/// Runs the real `svn` binary.
#[derive(Debug, Clone)]
pub struct SvnCli {
    program: PathBuf,
    timeout: Option<Duration>,
    cancel_token: CancellationToken,
}

impl SvnCli {
    /// Creates an executor for the given svn program (name or path).
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            timeout: None,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Kills any single svn command that runs longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Terminates running commands when `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Returns the configured svn program.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Resolves the program to an executable path.
    fn resolve(&self) -> SvnResult<PathBuf> {
        let name = self.program.to_string_lossy();
        ProcessBuilder::find(&name).ok_or_else(|| SvnError::NotFound {
            program: name.into_owned(),
        })
    }

    /// Builds `svn <subcommand> --non-interactive <rest>`.
    fn command(program: &Path, args: &[&str]) -> ProcessBuilder {
        let builder = ProcessBuilder::new(program).name("svn");
        match args.split_first() {
            Some((subcommand, rest)) => builder
                .arg(subcommand)
                .arg("--non-interactive")
                .args(rest),
            None => builder,
        }
    }
}

impl SvnExecutor for SvnCli {
    fn version(&self) -> BoxFuture<'_, SvnResult<String>> {
        Box::pin(async move {
            let program = self.resolve()?;
            let output = ProcessBuilder::new(program)
                .name("svn")
                .args(["--version", "--quiet"])
                .capture_output()
                .maybe_timeout(self.timeout)
                .run_with_cancellation(self.cancel_token.clone())
                .await?;
            Ok(output.stdout().trim().to_string())
        })
    }

    fn execute<'a>(
        &'a self,
        cwd: &'a Path,
        args: &'a [&'a str],
        capture: Capture,
    ) -> BoxFuture<'a, SvnResult<CommandOutput>> {
        Box::pin(async move {
            let stdout = match capture {
                Capture::Output => StreamFlags::KEEP_IN_STRING,
                Capture::Stream => StreamFlags::FORWARD_TO_LOG,
            };
            let builder = Self::command(&self.program, args)
                .cwd(cwd)
                .flag(ProcessFlags::ALLOW_FAILURE)
                .stdout_flags(stdout)
                .stderr_flags(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING)
                .maybe_timeout(self.timeout);
            let command = builder.command_line();

            let output = builder
                .run_with_cancellation(self.cancel_token.clone())
                .await?;

            if output.success() {
                let (stdout, stderr) = output.into_streams();
                Ok(CommandOutput { stdout, stderr })
            } else {
                Err(SvnError::CommandFailed {
                    command,
                    code: output.exit_code(),
                    stderr: output.stderr().trim().to_string(),
                })
            }
        })
    }
}
