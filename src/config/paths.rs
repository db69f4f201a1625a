// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working-copy path expansion.
//!
//! ```text
//! "$HOME/svn/${REPO}"   variables   $VAR  ${VAR}  %VAR%  (unknown kept verbatim)
//!        |
//!        v
//! "~/svn/x"             leading ~   home directory
//!        |
//!        v
//! "svn/x"               relative    joined to the working directory,
//!                                   `.` and `..` folded lexically
//! ```

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

static VAR_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"\$\{(?P<braced>[A-Za-z_][A-Za-z0-9_]*)\}|\$(?P<bare>[A-Za-z_][A-Za-z0-9_]*)|%(?P<percent>[A-Za-z_][A-Za-z0-9_()]*)%",
    )
    .ok()
});

/// Substitutes environment variables resolved through `lookup`.
///
/// Variables `lookup` does not know are left untouched.
pub fn expand_vars<F>(raw: &str, lookup: F) -> Cow<'_, str>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(re) = VAR_PATTERN.as_ref() else {
        return Cow::Borrowed(raw);
    };
    re.replace_all(raw, |caps: &Captures<'_>| {
        let name = caps
            .name("braced")
            .or_else(|| caps.name("bare"))
            .or_else(|| caps.name("percent"))
            .map_or("", |m| m.as_str());
        lookup(name).unwrap_or_else(|| caps[0].to_string())
    })
}

/// Replaces a leading `~` (alone or followed by a separator) with `home`.
#[must_use]
pub fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(raw);
    };
    match raw.strip_prefix('~') {
        Some("") => home.to_path_buf(),
        Some(rest) if rest.starts_with(['/', '\\']) => {
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(raw),
    }
}

/// Joins a relative path to `cwd` and folds `.` / `..` components.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never climb above the root.
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Full expansion: variables, then `~`, then [`absolutize`].
#[must_use]
pub fn expand_path<F>(raw: &Path, lookup: F, home: Option<&Path>, cwd: &Path) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let raw = raw.to_string_lossy();
    let vars = expand_vars(&raw, lookup);
    absolutize(&expand_home(&vars, home), cwd)
}

/// [`expand_path`] against the process environment, home directory and
/// current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn expand_path_env(raw: &Path) -> std::io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let home = dirs::home_dir();
    Ok(expand_path(
        raw,
        |name| std::env::var(name).ok(),
        home.as_deref(),
        &cwd,
    ))
}
