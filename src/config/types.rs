// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for svn-sync.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   global        GlobalConfig   logging, svn program, jobs, deadline
//!   repositories  [Binding]      { path, url, clean = false }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines.
    pub log_json: bool,
    /// svn executable name or path.
    pub svn: PathBuf,
    /// Worker pool size; `0` means one per processing unit.
    pub jobs: usize,
    /// Per-command deadline in seconds; `0` disables it.
    pub command_timeout_secs: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
            log_json: false,
            svn: PathBuf::from("svn"),
            jobs: 0,
            command_timeout_secs: 0,
        }
    }
}

impl GlobalConfig {
    /// Worker pool size with `0` resolved to the processing-unit count.
    #[must_use]
    pub fn effective_jobs(&self) -> usize {
        if self.jobs > 0 {
            return self.jobs;
        }
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4)
    }

    /// The per-command deadline, if any.
    #[must_use]
    pub const fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// One `[[repositories]]` entry: a directory kept in sync with a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Binding {
    /// Working-copy directory (absolute after loading).
    pub path: PathBuf,
    /// Repository URL, `svn|http|https://host/rest`.
    pub url: String,
    /// Discard local changes before updating.
    #[serde(default)]
    pub clean: bool,
}
