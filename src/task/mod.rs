// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository synchronization tasks.
//!
//! # Architecture
//!
//! ```text
//! SyncManager
//!   preflight (svn --version) --> create dirs
//!      |
//!      v   one worker per processing unit
//!   SyncTask x N ----> Reconciler (one per task)
//!                        Locate
//!                        Unlock             (ExpectedNoOp on failure)
//!                        EnsureInitialized  (checkout on E155007)
//!                        EnsureRelocated    (relocate on host change)
//!                        EnsureSwitched     (switch on URL change)
//!                        CleanIfRequested   (clean flag)
//!                        Update
//!      |
//!      v
//!   RunSummary (ok + actions / failed + error)
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SyncTask`] | Immutable `{path, url, clean}` unit of work |
//! | [`Step`] | Reconcile pipeline steps in execution order |
//! | [`StepOutcome`] | What a step did: acted, nothing to do, tolerated failure |
//! | [`Actions`] | Bitflags of corrective commands a run performed |
//! | [`Reconciler`] | Drives one task through all steps |
//! | [`SyncManager`] | Runs all tasks concurrently with failure isolation |

pub mod manager;
pub mod reconciler;

use bitflags::bitflags;
use std::path::{Path, PathBuf};

use crate::config::Binding;

pub use manager::{RunSummary, SyncManager, TaskOutcome};
pub use reconciler::{ReconcileReport, Reconciler};

/// Reconcile pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Bind the working context to the task's directory.
    Locate,
    /// Release stale locks left by an interrupted operation.
    Unlock,
    /// Check out the repository if the directory is not a working copy.
    EnsureInitialized,
    /// Relocate when the server host differs.
    EnsureRelocated,
    /// Switch when the tracked URL differs.
    EnsureSwitched,
    /// Discard local changes when the task asks for it.
    CleanIfRequested,
    /// Fetch the latest changes.
    Update,
}

impl Step {
    /// Returns all steps in execution order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Locate,
            Self::Unlock,
            Self::EnsureInitialized,
            Self::EnsureRelocated,
            Self::EnsureSwitched,
            Self::CleanIfRequested,
            Self::Update,
        ]
    }

    /// Returns the display name for this step.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Locate => "locate",
            Self::Unlock => "unlock",
            Self::EnsureInitialized => "ensure-initialized",
            Self::EnsureRelocated => "ensure-relocated",
            Self::EnsureSwitched => "ensure-switched",
            Self::CleanIfRequested => "clean-if-requested",
            Self::Update => "update",
        }
    }
}

/// Result of a step that did not abort the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran its corrective command.
    Done,
    /// State already matched; nothing ran beyond the inspection.
    Unchanged,
    /// The command failed in a way that is expected and harmless.
    ExpectedNoOp,
}

bitflags! {
    /// Corrective commands performed during one reconcile run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u8 {
        /// `svn checkout --force`.
        const CHECKOUT = 0x01;

        /// `svn relocate`.
        const RELOCATE = 0x02;

        /// `svn switch`.
        const SWITCH = 0x04;

        /// `svn cleanup --remove-unversioned` + `svn revert`.
        const CLEAN = 0x08;

        /// `svn update`.
        const UPDATE = 0x10;
    }
}

impl Actions {
    /// Lowercase names of the set flags, in pipeline order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        [
            (Self::CHECKOUT, "checkout"),
            (Self::RELOCATE, "relocate"),
            (Self::SWITCH, "switch"),
            (Self::CLEAN, "clean"),
            (Self::UPDATE, "update"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect()
    }
}

impl std::fmt::Display for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// One repository to synchronize.
///
/// Built once per run from a [`Binding`]; fields never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTask {
    local_path: PathBuf,
    remote_url: String,
    clean: bool,
}

impl SyncTask {
    /// Creates a task.
    pub fn new(local_path: impl Into<PathBuf>, remote_url: impl Into<String>, clean: bool) -> Self {
        Self {
            local_path: local_path.into(),
            remote_url: remote_url.into(),
            clean,
        }
    }

    /// Directory holding the working copy.
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// URL the working copy must track.
    #[must_use]
    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    /// Whether local modifications are discarded before updating.
    #[must_use]
    pub const fn clean(&self) -> bool {
        self.clean
    }
}

impl From<&Binding> for SyncTask {
    fn from(binding: &Binding) -> Self {
        Self::new(binding.path.clone(), binding.url.clone(), binding.clean)
    }
}
