// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Subversion command boundary.
//!
//! ```text
//!   WorkingCopy (typed commands, explicit cwd)
//!   info / cleanup / checkout / relocate / switch / revert / update
//!                 |
//!                 v
//!      ,----------------------,
//!      |  SvnExecutor (trait) |
//!      '----+------------+----'
//!           |            |
//!           v            v
//!        SvnCli       test fakes
//!   ProcessBuilder     (scripted)
//!   --non-interactive
//!
//!   url::extract_host      scheme://host/rest --> host
//!   signal::is_not_working_copy   stderr contains E155007
//! ```
//!
//! Every command carries its working directory explicitly; nothing here
//! touches the process-wide current directory, so any number of working
//! copies can be driven in parallel.

pub mod cli;
pub mod signal;
pub mod url;
pub mod working_copy;

#[cfg(test)]
pub(crate) mod test_utils;
#[cfg(test)]
mod tests;

use futures_util::future::BoxFuture;
use std::path::Path;

use crate::error::SvnResult;

pub use cli::SvnCli;
pub use working_copy::{InfoItem, WorkingCopy};

/// Whether a command's standard output is kept for the caller.
///
/// Standard error is always kept so failures can be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Keep stdout in [`CommandOutput::stdout`].
    Output,
    /// Stream stdout to the log only.
    Stream,
}

/// Result of one successful svn invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output (empty for [`Capture::Stream`]).
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Creates an output with the given stdout and empty stderr.
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Executes svn commands.
///
/// A non-zero exit must be reported as `SvnError::CommandFailed` carrying the
/// captured standard error.
pub trait SvnExecutor: Send + Sync {
    /// Checks that svn is installed and runnable, returning its version.
    fn version(&self) -> BoxFuture<'_, SvnResult<String>>;

    /// Runs `svn <args>` in `cwd` and waits for it to finish.
    fn execute<'a>(
        &'a self,
        cwd: &'a Path,
        args: &'a [&'a str],
        capture: Capture,
    ) -> BoxFuture<'a, SvnResult<CommandOutput>>;
}

impl<T: SvnExecutor + ?Sized> SvnExecutor for std::sync::Arc<T> {
    fn version(&self) -> BoxFuture<'_, SvnResult<String>> {
        (**self).version()
    }

    fn execute<'a>(
        &'a self,
        cwd: &'a Path,
        args: &'a [&'a str],
        capture: Capture,
    ) -> BoxFuture<'a, SvnResult<CommandOutput>> {
        (**self).execute(cwd, args, capture)
    }
}
