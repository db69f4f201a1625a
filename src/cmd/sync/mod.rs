// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync and check command implementations.
//!
//! ```text
//! run_sync_command
//!   select bindings (--only)  -->  SvnCli (timeout, cancel token)
//!   SyncManager (jobs)  <--  Ctrl+C cancels the shared token
//!   run_all: preflight (even with no repositories) --> create dirs --> reconcile
//!   summary (text or --json) on stdout, error if any task failed
//! ```

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::cli::sync::SyncArgs;
use crate::config::Config;
use crate::config::paths::expand_path_env;
use crate::error::Result;
use crate::svn::{SvnCli, SvnExecutor};
use crate::task::{SyncManager, SyncTask};

/// Resolves the tasks for this run.
///
/// `--only` paths are expanded like configured paths before matching.
///
/// # Errors
///
/// Returns an error if an `--only` path cannot be expanded or matches no
/// configured repository.
pub fn select_tasks(args: &SyncArgs, config: &Config) -> Result<Vec<SyncTask>> {
    let only = args
        .only
        .iter()
        .map(|p| expand_path_env(p).with_context(|| format!("cannot expand '{}'", p.display())))
        .collect::<Result<Vec<PathBuf>>>()?;

    if let Some(unknown) = only
        .iter()
        .find(|p| !config.repositories.iter().any(|b| &b.path == *p))
    {
        anyhow::bail!("no configured repository at '{}'", unknown.display());
    }

    Ok(config.select(&only).into_iter().map(SyncTask::from).collect())
}

/// Worker count: `--jobs`, then `global.jobs`, then processing units.
#[must_use]
pub fn effective_jobs(args: &SyncArgs, config: &Config) -> usize {
    args.jobs
        .filter(|&jobs| jobs > 0)
        .unwrap_or_else(|| config.global.effective_jobs())
}

/// Main handler for the sync command.
///
/// # Errors
///
/// Returns an error if svn is unavailable, a directory cannot be created, or
/// any repository fails to synchronize.
pub async fn run_sync_command(args: &SyncArgs, config: &Config) -> Result<()> {
    let tasks = select_tasks(args, config)?;

    // svn processes are killed through the same token
    let cancel_token = CancellationToken::new();
    let svn = SvnCli::new(&config.global.svn)
        .with_timeout(config.global.command_timeout())
        .with_cancel_token(cancel_token.clone());
    let mut manager = SyncManager::with_concurrency(Arc::new(svn), effective_jobs(args, config))
        .with_cancel_token(cancel_token.clone());
    for task in tasks {
        manager.add(task);
    }

    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting synchronization...");
            cancel_token.cancel();
        }
    });

    let result = manager.run_all().await;
    ctrl_c.abort();
    let summary = result.context("Synchronization aborted")?;
    if summary.outcomes().is_empty() {
        println!("No repositories configured");
        return Ok(());
    }

    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{}", summary.render());
    }

    if summary.is_success() {
        tracing::info!("All repositories synchronized");
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} repositories failed",
            summary.failed_count(),
            summary.outcomes().len()
        )
    }
}

/// Pre-flight only: reports the svn version.
///
/// # Errors
///
/// Returns an error if svn cannot be found or run.
pub async fn run_check_command(config: &Config) -> Result<()> {
    let svn = SvnCli::new(&config.global.svn).with_timeout(config.global.command_timeout());
    let version = svn
        .version()
        .await
        .with_context(|| format!("'{}' is not usable", svn.program().display()))?;
    println!("svn {version} ({})", svn.program().display());
    println!("{} repositories configured", config.repositories.len());
    Ok(())
}
