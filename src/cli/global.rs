// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE      ← Additional config files (can repeat)
//! --log-level N      ← Console verbosity (0-6)
//! --file-log-level N ← File verbosity (defaults to --log-level)
//! --log-file FILE    ← global.log_file override
//! --log-json         ← JSON lines in the log file
//! --svn PATH         ← global.svn override
//!
//! Precedence: CLI flags > SVNSYNC_* env > --config > svn-sync.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Writes the log file as JSON lines.
    #[arg(long = "log-json")]
    pub log_json: bool,

    /// svn executable name or path.
    #[arg(long = "svn", value_name = "PATH")]
    pub svn: Option<PathBuf>,

    /// Skips `svn-sync.toml` in the current directory, only uses --config.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,
}

impl GlobalOptions {
    /// Converts command-line options to `(key, value)` configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();

        if let Some(level) = self.log_level {
            overrides.push(("global.output_log_level", level.to_string()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("global.file_log_level", level.to_string()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("global.log_file", path.display().to_string()));
        }

        if self.log_json {
            overrides.push(("global.log_json", "true".to_string()));
        }

        if let Some(ref svn) = self.svn {
            overrides.push(("global.svn", svn.display().to_string()));
        }

        overrides
    }
}
