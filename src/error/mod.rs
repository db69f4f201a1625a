// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              SyncError (16 bytes)
//!                     |
//!     +------+--------+--------+------+
//!     |      |        |        |      |
//!     v      v        v        v      v
//!    Svn    Url     Config    Task    Fs
//!    Box    Box      Box      Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Svn      NotFound, CommandFailed, Process
//!   Url      HostParse
//!   Config   MissingKey, InvalidValue
//!   Task     StepFailed, Interrupted, Panicked
//!   Process  SpawnFailed, WaitFailed, NonZeroExit, Timeout, Interrupted
//!   Fs       CreateDir
//! ```
//!
//! `SyncError` is transparent: it displays the sub-error unchanged, so an
//! `anyhow` `{:#}` chain names each cause once.
//!
//! Library code returns [`SyncResult`]; the binary edges (`cmd`, `main`)
//! use [`Result`] (`anyhow`) and attach context.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SyncError`].
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Result type for the external tool boundary.
pub type SvnResult<T> = std::result::Result<T, SvnError>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum pointer-sized plus tag.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Subversion command failed.
    #[error(transparent)]
    Svn(#[from] Box<SvnError>),

    /// Repository URL could not be understood.
    #[error(transparent)]
    Url(#[from] Box<UrlError>),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] Box<ConfigError>),

    /// Per-repository task error.
    #[error(transparent)]
    Task(#[from] Box<TaskError>),

    /// Filesystem error.
    #[error(transparent)]
    Fs(#[from] Box<FsError>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SyncError {
                fn from(err: $error) -> Self {
                    SyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    SvnError => Svn,
    UrlError => Url,
    ConfigError => Config,
    TaskError => Task,
    FsError => Fs,
}

// --- Svn Errors ---

/// Errors raised at the `svn` command boundary.
#[derive(Debug, Error)]
pub enum SvnError {
    /// The svn executable could not be resolved.
    #[error("svn executable not found: '{program}'")]
    NotFound { program: String },

    /// svn ran and exited with a non-zero status.
    #[error("'{command}' exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// svn could not be run to completion.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl SvnError {
    /// Returns the captured standard error of a failed command.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Whether svn reported that the directory is not a working copy.
    #[must_use]
    pub fn is_not_working_copy(&self) -> bool {
        self.stderr()
            .is_some_and(crate::svn::signal::is_not_working_copy)
    }
}

// --- Url Errors ---

/// Repository URL errors.
#[derive(Debug, Error)]
pub enum UrlError {
    /// URL does not match `scheme://host/rest`.
    #[error("cannot extract host from '{url}' (expected svn|http|https://host/path)")]
    HostParse { url: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Task Errors ---

/// Per-repository task errors.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A reconcile step failed; the cause is part of the message.
    #[error("{step} failed for '{path}' ({url}): {error}")]
    StepFailed {
        step: &'static str,
        path: String,
        url: String,
        error: SyncError,
    },

    /// The run was interrupted before or while the task ran.
    #[error("task for '{0}' was interrupted")]
    Interrupted(String),

    /// The worker running the task panicked.
    #[error("task for '{path}' panicked: {message}")]
    Panicked { path: String, message: String },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {error}")]
    SpawnFailed {
        command: String,
        error: std::io::Error,
    },

    /// Failed while waiting on a spawned process.
    #[error("failed waiting for process '{command}': {error}")]
    WaitFailed {
        command: String,
        error: std::io::Error,
    },

    /// Process exited with a non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process timed out and was killed.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Process was terminated because the run was cancelled.
    #[error("process '{command}' was interrupted")]
    Interrupted { command: String },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Could not create a working-copy directory.
    #[error("failed to create directory '{path}': {error}")]
    CreateDir {
        path: String,
        error: std::io::Error,
    },
}
