// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core process management.
//!
//! ```text
//!      core
//!       |
//!       v
//!    process
//!       |
//!   Builder --> run_with_cancellation --> ProcessOutput
//! ```

pub mod process;
