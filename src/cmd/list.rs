// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! List command implementation for svn-sync.

use crate::config::Config;

/// Prints every configured repository with its resolved path.
pub fn run_list_command(config: &Config) {
    let lines = config.format_repositories();
    if lines.is_empty() {
        println!("No repositories configured");
    } else {
        for line in &lines {
            println!("{line}");
        }
    }
}
