// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |         sync / check / list / inis
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML, layered, bindings  |
//!              '-------------+-------------'
//!                            v
//!                          task
//!                 SyncManager (worker pool)
//!                            |
//!                       Reconciler
//!                 (one per repository)
//!                            |
//!                            v
//!                           svn
//!             SvnExecutor, WorkingCopy, host parsing
//!
//!   +-----------------------------------------+
//!   |  core   process (spawn, capture, kill)  |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod svn;
pub mod task;
