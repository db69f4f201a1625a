// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for a full synchronization run.
//!
//! Drives `SyncManager` end to end against a scripted svn executor.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use svn_sync::error::{SvnError, SvnResult, SyncError};
use svn_sync::svn::{Capture, CommandOutput, SvnExecutor};
use svn_sync::task::{Actions, SyncManager, SyncTask};

const NOT_WC: &str = "svn: E155007: '.' is not a working copy";

/// Answers svn commands from an in-memory map of checked-out directories.
#[derive(Default)]
struct ScriptedSvn {
    copies: Mutex<BTreeMap<PathBuf, String>>,
    log: Mutex<Vec<(PathBuf, String)>>,
    broken_url: Option<String>,
    installed: bool,
}

impl ScriptedSvn {
    fn installed() -> Self {
        Self {
            installed: true,
            ..Self::default()
        }
    }

    fn with_broken_url(mut self, url: &str) -> Self {
        self.broken_url = Some(url.to_string());
        self
    }

    fn commands(&self, path: &Path) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, c)| c.clone())
            .collect()
    }

    fn respond(&self, cwd: &Path, args: &[&str]) -> SvnResult<CommandOutput> {
        let command = args.join(" ");
        self.log
            .lock()
            .unwrap()
            .push((cwd.to_path_buf(), command.clone()));

        let failed = |stderr: &str| SvnError::CommandFailed {
            command: format!("svn {command}"),
            code: 1,
            stderr: stderr.to_string(),
        };

        let mut copies = self.copies.lock().unwrap();
        match args {
            ["checkout", "--force", url, "."] => {
                if self.broken_url.as_deref() == Some(*url) {
                    return Err(failed("svn: E170013: Unable to connect to a repository"));
                }
                copies.insert(cwd.to_path_buf(), (*url).to_string());
                Ok(CommandOutput::default())
            }
            _ => {
                let Some(url) = copies.get(cwd) else {
                    return Err(failed(NOT_WC));
                };
                match args {
                    ["info", "--show-item", _] => Ok(CommandOutput::stdout(format!("{url}\n"))),
                    _ => Ok(CommandOutput::default()),
                }
            }
        }
    }
}

impl SvnExecutor for ScriptedSvn {
    fn version(&self) -> BoxFuture<'_, SvnResult<String>> {
        let result = if self.installed {
            Ok("1.14.3".to_string())
        } else {
            Err(SvnError::NotFound {
                program: "svn".to_string(),
            })
        };
        async move { result }.boxed()
    }

    fn execute<'a>(
        &'a self,
        cwd: &'a Path,
        args: &'a [&'a str],
        _capture: Capture,
    ) -> BoxFuture<'a, SvnResult<CommandOutput>> {
        async move { self.respond(cwd, args) }.boxed()
    }
}

// =============================================================================
// Full runs
// =============================================================================

#[tokio::test]
async fn sync_two_repositories_one_failing() {
    let tmp = tempfile::tempdir().unwrap();
    let good = tmp.path().join("svn/trunk");
    let bad = tmp.path().join("svn/branch");
    let svn = Arc::new(
        ScriptedSvn::installed().with_broken_url("https://svn.example.com/repo/branches/b1"),
    );

    let mut manager = SyncManager::with_concurrency(Arc::clone(&svn), 4);
    manager.add(SyncTask::new(&good, "https://svn.example.com/repo/trunk", false));
    manager.add(SyncTask::new(
        &bad,
        "https://svn.example.com/repo/branches/b1",
        false,
    ));

    let summary = manager.run_all().await.unwrap();

    assert!(!summary.is_success());
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(
        summary.outcomes()[0].result.as_ref().unwrap(),
        &(Actions::CHECKOUT | Actions::UPDATE)
    );
    assert!(summary.outcomes()[1].result.is_err());
    insta::assert_debug_snapshot!(svn.commands(&good), @r#"
    [
        "cleanup",
        "info",
        "checkout --force https://svn.example.com/repo/trunk .",
        "info --show-item repos-root-url",
        "info --show-item url",
        "update",
    ]
    "#);
    assert!(!svn.commands(&bad).contains(&"update".to_string()));
}

#[tokio::test]
async fn sync_second_run_only_updates() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("abyss");
    let svn = Arc::new(ScriptedSvn::installed());
    let task = SyncTask::new(&path, "svn://svn.example.com/abyss/trunk", false);

    for _ in 0..2 {
        let mut manager = SyncManager::with_concurrency(Arc::clone(&svn), 1);
        manager.add(task.clone());
        let summary = manager.run_all().await.unwrap();
        assert!(summary.is_success());
    }

    let checkouts = svn
        .commands(&path)
        .iter()
        .filter(|c| c.starts_with("checkout"))
        .count();
    assert_eq!(checkouts, 1);
}

#[tokio::test]
async fn sync_aborts_when_svn_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("never-created");
    let svn = Arc::new(ScriptedSvn::default());

    let mut manager = SyncManager::with_concurrency(Arc::clone(&svn), 2);
    manager.add(SyncTask::new(&path, "https://svn.example.com/repo/trunk", false));

    let err = manager.run_all().await.unwrap_err();

    assert!(matches!(err, SyncError::Svn(_)), "{err}");
    assert!(!path.exists());
    assert!(svn.commands(&path).is_empty());
}

#[tokio::test]
async fn sync_summary_json_reports_failures() {
    let tmp = tempfile::tempdir().unwrap();
    let svn = Arc::new(ScriptedSvn::installed().with_broken_url("https://down.example.com/r"));

    let mut manager = SyncManager::with_concurrency(svn, 2);
    manager.add(SyncTask::new(
        tmp.path().join("r"),
        "https://down.example.com/r",
        false,
    ));

    let summary = manager.run_all().await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();

    assert_eq!(json["total"], 1);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["repositories"][0]["status"], "failed");
    assert!(
        json["repositories"][0]["error"]
            .as_str()
            .unwrap()
            .contains("E170013")
    );
}
