// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository reconcile state machine.
//!
//! ```text
//! Reconciler::new(executor, task)
//!   .with_cancel_token()
//!   .run().await
//!     for step in Step::all():
//!       cancelled?  --> TaskError::Interrupted
//!       step        --> Done | Unchanged | ExpectedNoOp
//!       svn error   --> TaskError::StepFailed { step, path, url }
//! ```
//!
//! Every step inspects state first and only acts when it differs from the
//! task, so a run against a converged working copy issues nothing but
//! queries, the unlock, and the final update.

use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{Actions, Step, StepOutcome, SyncTask};
use crate::error::{SvnError, SyncError, SyncResult, TaskError};
use crate::svn::url::same_host;
use crate::svn::{InfoItem, SvnExecutor, WorkingCopy};

/// What a successful reconcile run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Directory of the working copy.
    pub path: PathBuf,
    /// URL the working copy now tracks.
    pub url: String,
    /// Corrective commands that ran.
    pub actions: Actions,
}

/// Drives one [`SyncTask`] through every [`Step`].
pub struct Reconciler<'a, E: SvnExecutor + ?Sized> {
    task: &'a SyncTask,
    wc: WorkingCopy<'a, E>,
    cancel_token: CancellationToken,
    actions: Actions,
}

impl<'a, E: SvnExecutor + ?Sized> Reconciler<'a, E> {
    /// Creates a reconciler for `task` backed by `executor`.
    #[must_use]
    pub fn new(executor: &'a E, task: &'a SyncTask) -> Self {
        Self {
            task,
            wc: WorkingCopy::new(executor, task.local_path()),
            cancel_token: CancellationToken::new(),
            actions: Actions::empty(),
        }
    }

    /// Stops between steps once `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Commands performed so far.
    #[must_use]
    pub const fn actions(&self) -> Actions {
        self.actions
    }

    fn path_display(&self) -> String {
        self.task.local_path().display().to_string()
    }

    /// Wraps `err` with the failing step, path and URL.
    fn fail(&self, step: Step, err: impl Into<SyncError>) -> SyncError {
        TaskError::StepFailed {
            step: step.name(),
            path: self.path_display(),
            url: self.task.remote_url().to_string(),
            error: err.into(),
        }
        .into()
    }

    /// Runs every step in order.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::StepFailed` for the first fatal step, or
    /// `TaskError::Interrupted` if cancellation is requested between steps.
    pub async fn run(mut self) -> SyncResult<ReconcileReport> {
        for &step in Step::all() {
            if self.cancel_token.is_cancelled() {
                return Err(TaskError::Interrupted(self.path_display()).into());
            }

            let outcome = match step {
                Step::Locate => self.locate(),
                Step::Unlock => self.unlock().await?,
                Step::EnsureInitialized => self.ensure_initialized().await?,
                Step::EnsureRelocated => self.ensure_relocated().await?,
                Step::EnsureSwitched => self.ensure_switched().await?,
                Step::CleanIfRequested => self.clean_if_requested().await?,
                Step::Update => self.update().await?,
            };
            debug!(step = step.name(), ?outcome, "Step finished");
        }

        Ok(ReconcileReport {
            path: self.task.local_path().to_path_buf(),
            url: self.task.remote_url().to_string(),
            actions: self.actions,
        })
    }

    /// Every command below carries the task directory as its cwd.
    pub fn locate(&self) -> StepOutcome {
        debug!(path = %self.wc.path().display(), "Working directory located");
        StepOutcome::Done
    }

    /// `svn cleanup`; a failed cleanup is tolerated.
    ///
    /// The directory is often not a working copy yet, in which case svn
    /// refuses. Only failures to run svn at all are fatal.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::StepFailed` if svn could not be run.
    pub async fn unlock(&self) -> SyncResult<StepOutcome> {
        match self.wc.cleanup().await {
            Ok(()) => Ok(StepOutcome::Done),
            Err(SvnError::CommandFailed { stderr, .. }) => {
                debug!(path = %self.path_display(), %stderr, "Cleanup skipped");
                Ok(StepOutcome::ExpectedNoOp)
            }
            Err(e) => Err(self.fail(Step::Unlock, e)),
        }
    }

    /// `svn info`; checks out the repository if the directory is not a
    /// working copy.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::StepFailed` if `svn info` fails for any other
    /// reason or the checkout fails.
    pub async fn ensure_initialized(&mut self) -> SyncResult<StepOutcome> {
        let checkout = match self.wc.info().await {
            Ok(_) => false,
            Err(e) if e.is_not_working_copy() => true,
            Err(e) => return Err(self.fail(Step::EnsureInitialized, e)),
        };

        info!(
            path = %self.path_display(),
            url = %self.task.remote_url(),
            checkout,
            "Working copy initialization"
        );
        if !checkout {
            return Ok(StepOutcome::Unchanged);
        }

        self.wc
            .checkout(self.task.remote_url())
            .await
            .map_err(|e| self.fail(Step::EnsureInitialized, e))?;
        self.actions |= Actions::CHECKOUT;
        Ok(StepOutcome::Done)
    }

    /// Relocates when the repository root is on another host.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::StepFailed` if the root cannot be queried, either
    /// URL has no recognizable host, or the relocate fails.
    pub async fn ensure_relocated(&mut self) -> SyncResult<StepOutcome> {
        let root = self
            .wc
            .info_item(InfoItem::ReposRootUrl)
            .await
            .map_err(|e| self.fail(Step::EnsureRelocated, e))?;
        let relocate = !same_host(&root, self.task.remote_url())
            .map_err(|e| self.fail(Step::EnsureRelocated, e))?;

        info!(
            path = %self.path_display(),
            url = %self.task.remote_url(),
            %root,
            relocate,
            "Repository host check"
        );
        if !relocate {
            return Ok(StepOutcome::Unchanged);
        }

        self.wc
            .relocate(self.task.remote_url())
            .await
            .map_err(|e| self.fail(Step::EnsureRelocated, e))?;
        self.actions |= Actions::RELOCATE;
        Ok(StepOutcome::Done)
    }

    /// Switches when the tracked URL differs from the task's URL.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::StepFailed` if the URL cannot be queried or the
    /// switch fails.
    pub async fn ensure_switched(&mut self) -> SyncResult<StepOutcome> {
        let current = self
            .wc
            .info_item(InfoItem::Url)
            .await
            .map_err(|e| self.fail(Step::EnsureSwitched, e))?;
        let switch = current != self.task.remote_url();

        info!(
            path = %self.path_display(),
            url = %self.task.remote_url(),
            %current,
            switch,
            "Repository URL check"
        );
        if !switch {
            return Ok(StepOutcome::Unchanged);
        }

        self.wc
            .switch(self.task.remote_url())
            .await
            .map_err(|e| self.fail(Step::EnsureSwitched, e))?;
        self.actions |= Actions::SWITCH;
        Ok(StepOutcome::Done)
    }

    /// Removes unversioned and ignored files, then reverts local changes.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::StepFailed` if either command fails.
    pub async fn clean_if_requested(&mut self) -> SyncResult<StepOutcome> {
        if !self.task.clean() {
            return Ok(StepOutcome::Unchanged);
        }

        info!(path = %self.path_display(), "Discarding local changes");
        self.wc
            .remove_unversioned()
            .await
            .map_err(|e| self.fail(Step::CleanIfRequested, e))?;
        self.wc
            .revert_all()
            .await
            .map_err(|e| self.fail(Step::CleanIfRequested, e))?;
        self.actions |= Actions::CLEAN;
        Ok(StepOutcome::Done)
    }

    /// `svn update`.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::StepFailed` if the update fails.
    pub async fn update(&mut self) -> SyncResult<StepOutcome> {
        self.wc
            .update()
            .await
            .map_err(|e| self.fail(Step::Update, e))?;
        self.actions |= Actions::UPDATE;
        Ok(StepOutcome::Done)
    }
}
