// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository URL helpers.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::UrlError;

/// `scheme://host/rest`, scheme one of `svn`, `http`, `https`.
static HOST_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:svn|https?)://(?P<host>[^/]+?)/.*$").ok());

/// Extracts the host component of a repository URL.
///
/// Sub-paths are ignored, so a trunk and a branch URL on the same server
/// yield the same host.
///
/// # Errors
///
/// Returns `UrlError::HostParse` if `url` is not `scheme://host/rest` with a
/// supported scheme.
///
/// # Example
///
/// ```
/// use svn_sync::svn::url::extract_host;
///
/// assert_eq!(extract_host("https://svn.example.com/repo/trunk").unwrap(), "svn.example.com");
/// assert!(extract_host("not-a-url").is_err());
/// ```
pub fn extract_host(url: &str) -> Result<&str, UrlError> {
    HOST_PATTERN
        .as_ref()
        .and_then(|re| re.captures(url))
        .and_then(|caps| caps.name("host"))
        .map(|m| m.as_str())
        .ok_or_else(|| UrlError::HostParse {
            url: url.to_string(),
        })
}

/// Whether two URLs point at the same server.
///
/// # Errors
///
/// Returns `UrlError::HostParse` if either URL cannot be parsed.
pub fn same_host(a: &str, b: &str) -> Result<bool, UrlError> {
    Ok(extract_host(a)? == extract_host(b)?)
}
