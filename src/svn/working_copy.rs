// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed svn operations on one working copy.

use std::path::Path;

use super::{Capture, CommandOutput, SvnExecutor};
use crate::error::SvnResult;

/// Single-value `svn info --show-item` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoItem {
    /// Root URL of the repository (`repos-root-url`).
    ReposRootUrl,
    /// URL the working copy tracks (`url`).
    Url,
}

impl InfoItem {
    /// The `--show-item` argument.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReposRootUrl => "repos-root-url",
            Self::Url => "url",
        }
    }
}

/// A directory bound to an executor.
///
/// Every operation runs with the directory as its working directory.
pub struct WorkingCopy<'a, E: SvnExecutor + ?Sized> {
    executor: &'a E,
    path: &'a Path,
}

impl<'a, E: SvnExecutor + ?Sized> WorkingCopy<'a, E> {
    pub const fn new(executor: &'a E, path: &'a Path) -> Self {
        Self { executor, path }
    }

    /// The directory this working copy lives in.
    #[must_use]
    pub const fn path(&self) -> &Path {
        self.path
    }

    async fn run(&self, args: &[&str], capture: Capture) -> SvnResult<CommandOutput> {
        self.executor.execute(self.path, args, capture).await
    }

    /// `svn cleanup`: releases stale locks from an interrupted operation.
    ///
    /// # Errors
    ///
    /// Fails when svn fails, including when the directory is not a working copy.
    pub async fn cleanup(&self) -> SvnResult<()> {
        self.run(&["cleanup"], Capture::Output).await.map(drop)
    }

    /// `svn info`.
    ///
    /// # Errors
    ///
    /// Fails when svn fails; see `SvnError::is_not_working_copy`.
    pub async fn info(&self) -> SvnResult<String> {
        self.run(&["info"], Capture::Output)
            .await
            .map(|out| out.stdout)
    }

    /// `svn info --show-item <item>`, with the trailing newline stripped.
    ///
    /// # Errors
    ///
    /// Fails when svn fails.
    pub async fn info_item(&self, item: InfoItem) -> SvnResult<String> {
        let out = self
            .run(&["info", "--show-item", item.as_str()], Capture::Output)
            .await?;
        Ok(out.stdout.trim_end_matches(['\r', '\n']).to_string())
    }

    /// `svn checkout --force <url> .`: populates the existing directory.
    ///
    /// # Errors
    ///
    /// Fails when svn fails.
    pub async fn checkout(&self, url: &str) -> SvnResult<()> {
        self.run(&["checkout", "--force", url, "."], Capture::Stream)
            .await
            .map(drop)
    }

    /// `svn relocate <url>`: rewrites the recorded server root.
    ///
    /// # Errors
    ///
    /// Fails when svn fails.
    pub async fn relocate(&self, url: &str) -> SvnResult<()> {
        self.run(&["relocate", url], Capture::Stream).await.map(drop)
    }

    /// `svn switch <url>`: tracks another path on the same server.
    ///
    /// # Errors
    ///
    /// Fails when svn fails.
    pub async fn switch(&self, url: &str) -> SvnResult<()> {
        self.run(&["switch", url], Capture::Stream).await.map(drop)
    }

    /// `svn cleanup --remove-unversioned --remove-ignored`.
    ///
    /// # Errors
    ///
    /// Fails when svn fails.
    pub async fn remove_unversioned(&self) -> SvnResult<()> {
        self.run(
            &["cleanup", "--remove-unversioned", "--remove-ignored"],
            Capture::Stream,
        )
        .await
        .map(drop)
    }

    /// `svn revert --recursive --remove-added .`.
    ///
    /// # Errors
    ///
    /// Fails when svn fails.
    pub async fn revert_all(&self) -> SvnResult<()> {
        self.run(
            &["revert", "--recursive", "--remove-added", "."],
            Capture::Stream,
        )
        .await
        .map(drop)
    }

    /// `svn update`.
    ///
    /// # Errors
    ///
    /// Fails when svn fails.
    pub async fn update(&self) -> SvnResult<()> {
        self.run(&["update"], Capture::Stream).await.map(drop)
    }
}
