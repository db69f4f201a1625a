// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync command arguments.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    /// Maximum number of repositories synchronized at once
    /// (default: global.jobs, or one per processing unit).
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Only synchronizes the repository at PATH. Can be specified multiple
    /// times; paths are expanded like the configured ones.
    #[arg(long = "only", value_name = "PATH", action = clap::ArgAction::Append)]
    pub only: Vec<PathBuf>,

    /// Prints the run summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}
