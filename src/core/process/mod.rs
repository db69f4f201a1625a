// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("svn")
//!   .args() .cwd() .capture_stdout() .maybe_timeout()
//!   .run() / .run_with_cancellation()
//!       --> tokio::process::Command
//!           stream stdout/stderr
//!           deadline / cancellation kill the child
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod io;
mod runner;
