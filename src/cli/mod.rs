// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for svn-sync using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! svn-sync [global options] [command]
//! sync [--jobs N] [--only PATH]... [--json]   (default)
//! check
//! list
//! options
//! inis
//! version
//! ```

pub mod global;
pub mod sync;


use crate::cli::global::GlobalOptions;
use crate::cli::sync::SyncArgs;
use clap::{Parser, Subcommand};

/// Subversion working-copy synchronizer
///
/// Keeps a fixed set of Subversion working copies clean and up to date.
#[derive(Debug, Parser)]
#[command(
    name = "svn-sync",
    author,
    version,
    about = "Subversion working-copy synchronizer",
    long_about = "svn-sync Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Brings every configured working copy to the configured URL:\n\
                  checks out missing copies, relocates after a server move,\n\
                  switches after a branch change, optionally discards local\n\
                  changes, then updates. Invoking `svn-sync` without a command\n\
                  runs `sync`.",
    after_help = "CONFIG FILES:\n\n\
                  svn-sync reads `svn-sync.toml` from the current directory when\n\
                  present, then every file given with --config, in order. Later\n\
                  files override earlier ones; SVNSYNC_<SECTION>__<KEY> environment\n\
                  variables override files, and command-line flags override both.\n\
                  Use --no-default-config to skip `svn-sync.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all global options and their values.
    Options,

    /// Lists the configuration files in load order.
    Inis,

    /// Lists the configured repositories.
    List,

    /// Checks that svn can be run.
    Check,

    /// Synchronizes the configured repositories.
    Sync(SyncArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
