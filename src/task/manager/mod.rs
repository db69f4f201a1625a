// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync manager for running reconciliations concurrently.
//!
//! ```text
//! SyncManager::new(executor)
//!   .with_concurrency()  .with_cancel_token()  .add()
//!   .run_all().await
//!       preflight   svn --version           (fatal for run)
//!       prepare     create_dir_all per task (fatal for run)
//!       reconcile   JoinSet, Semaphore(jobs), one `repo` span per task
//!                   failures isolated, panics caught
//!       --> RunSummary (task order)
//! ```

use futures_util::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::{Actions, Reconciler, SyncTask};
use crate::error::{FsError, SyncError, SyncResult, TaskError};
use crate::svn::SvnExecutor;

/// Outcome of one task.
#[derive(Debug)]
pub struct TaskOutcome {
    /// Directory of the working copy.
    pub path: PathBuf,
    /// Target URL.
    pub url: String,
    /// Commands performed, or the error that stopped the task.
    pub result: SyncResult<Actions>,
}

impl TaskOutcome {
    /// Whether the task completed through update.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a run, in the order tasks were added.
#[derive(Debug, Default)]
pub struct RunSummary {
    outcomes: Vec<TaskOutcome>,
}

#[derive(Serialize)]
struct OutcomeView<'a> {
    path: &'a Path,
    url: &'a str,
    status: &'static str,
    actions: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct SummaryView<'a> {
    total: usize,
    ok: usize,
    failed: usize,
    repositories: Vec<OutcomeView<'a>>,
}

impl RunSummary {
    /// Per-task outcomes.
    #[must_use]
    pub fn outcomes(&self) -> &[TaskOutcome] {
        &self.outcomes
    }

    /// Whether every task completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(TaskOutcome::is_ok)
    }

    /// Number of failed tasks.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    /// Human-readable summary, one line per repository plus a total.
    #[must_use]
    pub fn render(&self) -> String {
        let width = self
            .outcomes
            .iter()
            .map(|o| o.path.display().to_string().len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for outcome in &self.outcomes {
            let path = outcome.path.display().to_string();
            let line = match &outcome.result {
                Ok(actions) => format!("ok      {path:<width$}  {actions}"),
                Err(e) => format!("FAILED  {path:<width$}  {e}"),
            };
            out.push_str(line.trim_end());
            out.push('\n');
        }
        let failed = self.failed_count();
        out.push_str(&format!(
            "{} repositories: {} ok, {} failed",
            self.outcomes.len(),
            self.outcomes.len() - failed,
            failed
        ));
        out
    }

    /// The summary as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let failed = self.failed_count();
        let view = SummaryView {
            total: self.outcomes.len(),
            ok: self.outcomes.len() - failed,
            failed,
            repositories: self
                .outcomes
                .iter()
                .map(|o| OutcomeView {
                    path: &o.path,
                    url: &o.url,
                    status: if o.is_ok() { "ok" } else { "failed" },
                    actions: o.result.as_ref().map(Actions::names).unwrap_or_default(),
                    error: o.result.as_ref().err().map(ToString::to_string),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&view)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Manager for running reconciliations.
///
/// Tasks run concurrently, at most `max_concurrent` at a time. A failing task
/// never cancels its siblings; only the shared cancellation token does.
pub struct SyncManager<E: SvnExecutor + ?Sized> {
    /// Executor shared by all tasks.
    executor: Arc<E>,

    /// Tasks in configuration order.
    tasks: Vec<SyncTask>,

    /// Cancellation token for Ctrl-C.
    cancel_token: CancellationToken,

    /// Worker pool size.
    max_concurrent: usize,
}

impl<E: SvnExecutor + ?Sized + 'static> SyncManager<E> {
    /// Creates a manager with one worker per processing unit.
    #[must_use]
    pub fn new(executor: Arc<E>) -> Self {
        let max_concurrent = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4); // Fallback to 4 if unavailable
        Self::with_concurrency(executor, max_concurrent)
    }

    /// Creates a manager with a specific worker count (at least one).
    #[must_use]
    pub fn with_concurrency(executor: Arc<E>, max_concurrent: usize) -> Self {
        Self {
            executor,
            tasks: Vec::new(),
            cancel_token: CancellationToken::new(),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Uses `token` for cancellation.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Adds a task.
    pub fn add(&mut self, task: SyncTask) {
        self.tasks.push(task);
    }

    /// Returns the tasks.
    #[must_use]
    pub fn tasks(&self) -> &[SyncTask] {
        &self.tasks
    }

    /// Returns the number of tasks.
    #[must_use]
    pub const fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the worker pool size.
    #[must_use]
    pub const fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Returns the cancellation token for sharing with executors.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Cancels the run: running commands are killed, queued tasks never start.
    pub fn interrupt_all(&self) {
        tracing::info!("Interrupting all tasks");
        self.cancel_token.cancel();
    }

    /// Checks that svn can be run.
    ///
    /// # Errors
    ///
    /// Returns the svn error if the executable is missing or fails.
    pub async fn preflight(&self) -> SyncResult<String> {
        let version = self.executor.version().await?;
        tracing::info!(%version, "svn available");
        Ok(version)
    }

    /// Creates every task directory, including parents.
    ///
    /// # Errors
    ///
    /// Returns `FsError::CreateDir` for the first directory that cannot be
    /// created.
    pub async fn prepare_dirs(&self) -> SyncResult<()> {
        for task in &self.tasks {
            tokio::fs::create_dir_all(task.local_path())
                .await
                .map_err(|error| FsError::CreateDir {
                    path: task.local_path().display().to_string(),
                    error,
                })?;
            tracing::debug!(path = %task.local_path().display(), "Directory ready");
        }
        Ok(())
    }

    /// Pre-flight, directory preparation, then every task.
    ///
    /// # Errors
    ///
    /// Only run-level failures are errors: svn missing or a directory that
    /// cannot be created. Task failures are reported in the summary.
    pub async fn run_all(&self) -> SyncResult<RunSummary> {
        self.preflight().await?;
        self.prepare_dirs().await?;
        Ok(self.reconcile_all().await)
    }

    /// Runs every task and collects the outcomes.
    pub async fn reconcile_all(&self) -> RunSummary {
        if self.tasks.is_empty() {
            tracing::debug!("No tasks to run");
            return RunSummary::default();
        }

        tracing::info!(
            task_count = self.tasks.len(),
            workers = self.max_concurrent,
            "Starting synchronization"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut set = JoinSet::new();

        for (index, task) in self.tasks.iter().enumerate() {
            let executor = Arc::clone(&self.executor);
            let semaphore = Arc::clone(&semaphore);
            let token = self.cancel_token.clone();
            let task = task.clone();
            let span = tracing::info_span!("repo", path = %task.local_path().display());

            set.spawn(
                async move {
                    let result = AssertUnwindSafe(Self::run_one(&*executor, &task, semaphore, token))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|payload| {
                            Err(TaskError::Panicked {
                                path: task.local_path().display().to_string(),
                                message: panic_message(&*payload),
                            }
                            .into())
                        });
                    (index, task, result)
                }
                .instrument(span),
            );
        }

        let mut slots: Vec<Option<TaskOutcome>> = Vec::new();
        slots.resize_with(self.tasks.len(), || None);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, task, result)) => {
                    log_outcome(&task, &result);
                    slots[index] = Some(TaskOutcome {
                        path: task.local_path().to_path_buf(),
                        url: task.remote_url().to_string(),
                        result,
                    });
                }
                Err(e) => tracing::error!(error = %e, "Worker terminated abnormally"),
            }
        }

        let summary = collect_outcomes(&self.tasks, slots);
        tracing::info!(
            total = summary.outcomes.len(),
            failed = summary.failed_count(),
            "Synchronization finished"
        );
        summary
    }

    async fn run_one(
        executor: &E,
        task: &SyncTask,
        semaphore: Arc<Semaphore>,
        token: CancellationToken,
    ) -> SyncResult<Actions> {
        let interrupted = || -> SyncError {
            TaskError::Interrupted(task.local_path().display().to_string()).into()
        };

        let _permit = tokio::select! {
            permit = semaphore.acquire_owned() => permit.map_err(|_| interrupted())?,
            () = token.cancelled() => return Err(interrupted()),
        };

        Reconciler::new(executor, task)
            .with_cancel_token(token)
            .run()
            .await
            .map(|report| report.actions)
    }
}

/// Orders outcomes by task; a task whose worker never reported counts as
/// failed.
fn collect_outcomes(tasks: &[SyncTask], slots: Vec<Option<TaskOutcome>>) -> RunSummary {
    let outcomes = tasks
        .iter()
        .zip(slots)
        .map(|(task, slot)| {
            slot.unwrap_or_else(|| {
                let result = Err(TaskError::Panicked {
                    path: task.local_path().display().to_string(),
                    message: "worker terminated before reporting".to_string(),
                }
                .into());
                log_outcome(task, &result);
                TaskOutcome {
                    path: task.local_path().to_path_buf(),
                    url: task.remote_url().to_string(),
                    result,
                }
            })
        })
        .collect();
    RunSummary { outcomes }
}

fn log_outcome(task: &SyncTask, result: &SyncResult<Actions>) {
    let path = task.local_path().display();
    let url = task.remote_url();
    match result {
        Ok(actions) => {
            tracing::info!(%path, %url, %actions, "Repository synchronized");
        }
        Err(e) => {
            tracing::error!(%path, %url, error = %e, "Repository failed");
        }
    }
}
