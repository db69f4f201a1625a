// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Classification of svn error output.
//!
//! svn reports failures as `svn: E<code>: <message>` lines on stderr. The
//! codes are stable across releases and locales; the messages are not.

/// `SVN_ERR_WC_NOT_WORKING_COPY`.
pub const NOT_WORKING_COPY: &str = "E155007";

/// Whether svn's stderr says the directory is not a working copy.
#[must_use]
pub fn is_not_working_copy(stderr: &str) -> bool {
    stderr.contains(NOT_WORKING_COPY)
}
