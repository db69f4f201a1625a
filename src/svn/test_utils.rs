// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory svn for unit tests.
//!
//! Models each working copy as `{ root, url, dirty }` keyed by directory and
//! answers the subset of commands the reconciler issues. Every call is
//! recorded so tests can assert on the exact command sequence.

use futures_util::future::BoxFuture;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::url::extract_host;
use super::{Capture, CommandOutput, SvnExecutor};
use crate::error::{SvnError, SvnResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeCopy {
    pub(crate) root: String,
    pub(crate) url: String,
    pub(crate) dirty: bool,
}

#[derive(Debug, Default)]
struct FakeState {
    copies: BTreeMap<PathBuf, FakeCopy>,
    calls: Vec<(PathBuf, String)>,
    unreachable_hosts: BTreeSet<String>,
    failing: BTreeMap<String, String>,
    missing: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FakeSvn {
    state: Mutex<FakeState>,
}

/// `scheme://host/repo/rest` --> `scheme://host/repo`.
fn root_of(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let mut parts = rest.splitn(3, '/');
    match (parts.next(), parts.next()) {
        (Some(host), Some(repo)) => format!("{scheme}://{host}/{repo}"),
        _ => url.to_string(),
    }
}

/// Replaces the host of `url` with the host of `target`.
fn with_host_of(url: &str, target: &str) -> String {
    match (extract_host(url), extract_host(target)) {
        (Ok(old), Ok(new)) => url.replacen(old, new, 1),
        _ => url.to_string(),
    }
}

fn failed(args: &[&str], stderr: impl Into<String>) -> SvnError {
    SvnError::CommandFailed {
        command: format!("svn {}", args.join(" ")),
        code: 1,
        stderr: stderr.into(),
    }
}

impl FakeSvn {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Registers an existing working copy at `path` tracking `url`.
    pub(crate) fn with_copy(self, path: impl AsRef<Path>, url: &str) -> Self {
        self.lock().copies.insert(
            path.as_ref().to_path_buf(),
            FakeCopy {
                root: root_of(url),
                url: url.to_string(),
                dirty: false,
            },
        );
        self
    }

    /// Marks the working copy at `path` as having local modifications.
    pub(crate) fn with_dirty(self, path: impl AsRef<Path>) -> Self {
        if let Some(copy) = self.lock().copies.get_mut(path.as_ref()) {
            copy.dirty = true;
        }
        self
    }

    /// Network commands against `host` fail.
    pub(crate) fn with_unreachable_host(self, host: &str) -> Self {
        self.lock().unreachable_hosts.insert(host.to_string());
        self
    }

    /// Every command whose joined args equal `command` fails with `stderr`.
    pub(crate) fn with_failure(self, command: &str, stderr: &str) -> Self {
        self.lock()
            .failing
            .insert(command.to_string(), stderr.to_string());
        self
    }

    /// `version()` reports svn as not installed.
    pub(crate) fn without_svn(self) -> Self {
        self.lock().missing = true;
        self
    }

    pub(crate) fn copy(&self, path: impl AsRef<Path>) -> Option<FakeCopy> {
        self.lock().copies.get(path.as_ref()).cloned()
    }

    /// Commands issued in `path`, as joined argument strings.
    pub(crate) fn calls(&self, path: impl AsRef<Path>) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|(cwd, _)| cwd == path.as_ref())
            .map(|(_, cmd)| cmd.clone())
            .collect()
    }

    /// Number of commands in `path` starting with `prefix`.
    pub(crate) fn count(&self, path: impl AsRef<Path>, prefix: &str) -> usize {
        self.calls(path)
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .count()
    }

    fn respond(&self, cwd: &Path, args: &[&str]) -> SvnResult<CommandOutput> {
        let joined = args.join(" ");
        let mut state = self.lock();
        state.calls.push((cwd.to_path_buf(), joined.clone()));

        if let Some(stderr) = state.failing.get(&joined) {
            return Err(failed(args, stderr.clone()));
        }

        let not_wc = || {
            failed(
                args,
                format!(
                    "svn: E155007: '{}' is not a working copy",
                    cwd.display()
                ),
            )
        };
        let unreachable_hosts = state.unreachable_hosts.clone();
        let unreachable = |url: &str| {
            extract_host(url)
                .map(|host| unreachable_hosts.contains(host))
                .unwrap_or(false)
        };
        let connect_failed = |url: &str| {
            failed(
                args,
                format!("svn: E170013: Unable to connect to a repository at URL '{url}'"),
            )
        };

        match args {
            ["checkout", "--force", url, "."] => {
                if unreachable(*url) {
                    return Err(connect_failed(*url));
                }
                state.copies.insert(
                    cwd.to_path_buf(),
                    FakeCopy {
                        root: root_of(url),
                        url: (*url).to_string(),
                        dirty: false,
                    },
                );
                Ok(CommandOutput::default())
            }
            _ => {
                let copy = state.copies.get(cwd).cloned().ok_or_else(not_wc)?;
                let output = match args {
                    ["cleanup"] | ["info"] => CommandOutput::stdout(format!(
                        "Path: .\nURL: {}\nRepository Root: {}\n",
                        copy.url, copy.root
                    )),
                    ["info", "--show-item", "repos-root-url"] => {
                        CommandOutput::stdout(format!("{}\n", copy.root))
                    }
                    ["info", "--show-item", "url"] => {
                        CommandOutput::stdout(format!("{}\n", copy.url))
                    }
                    ["relocate", url] => {
                        let updated = FakeCopy {
                            root: with_host_of(&copy.root, url),
                            url: with_host_of(&copy.url, url),
                            dirty: copy.dirty,
                        };
                        state.copies.insert(cwd.to_path_buf(), updated);
                        CommandOutput::default()
                    }
                    ["switch", url] => {
                        if unreachable(*url) {
                            return Err(connect_failed(*url));
                        }
                        let updated = FakeCopy {
                            url: (*url).to_string(),
                            ..copy
                        };
                        state.copies.insert(cwd.to_path_buf(), updated);
                        CommandOutput::default()
                    }
                    ["cleanup", "--remove-unversioned", "--remove-ignored"]
                    | ["revert", "--recursive", "--remove-added", "."] => {
                        let updated = FakeCopy {
                            dirty: false,
                            ..copy
                        };
                        state.copies.insert(cwd.to_path_buf(), updated);
                        CommandOutput::default()
                    }
                    ["update"] => {
                        if unreachable(copy.url.as_str()) {
                            return Err(connect_failed(copy.url.as_str()));
                        }
                        CommandOutput::default()
                    }
                    _ => return Err(failed(args, format!("svn: unexpected command '{joined}'"))),
                };
                Ok(output)
            }
        }
    }
}

impl SvnExecutor for FakeSvn {
    fn version(&self) -> BoxFuture<'_, SvnResult<String>> {
        let missing = self.lock().missing;
        Box::pin(async move {
            if missing {
                Err(SvnError::NotFound {
                    program: "svn".to_string(),
                })
            } else {
                Ok("1.14.3".to_string())
            }
        })
    }

    fn execute<'a>(
        &'a self,
        cwd: &'a Path,
        args: &'a [&'a str],
        _capture: Capture,
    ) -> BoxFuture<'a, SvnResult<CommandOutput>> {
        Box::pin(async move { self.respond(cwd, args) })
    }
}
