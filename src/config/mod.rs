// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for svn-sync.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. svn-sync.toml (cwd, optional)
//! 3. --config (repeatable)
//! 4. SVNSYNC_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! SVNSYNC_GLOBAL__JOBS=2              → global.jobs = 2
//! SVNSYNC_GLOBAL__SVN=/opt/svn/bin/svn → global.svn = "/opt/svn/bin/svn"
//! SVNSYNC_GLOBAL__LOG_FILE=sync.log   → global.log_file = "sync.log"
//! ```
//!
//! # Repositories
//!
//! ```toml
//! [[repositories]]
//! path = "$HOME/svn/Trunk/Abyss"
//! url = "http://svn.example.com/svn/Abyss/trunk/Abyss"
//! clean = true
//! ```

pub mod loader;
pub mod paths;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result, SyncResult};
use crate::svn::url::extract_host;

pub use loader::ConfigLoader;
pub use types::{Binding, GlobalConfig};

/// Name of the configuration file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "svn-sync.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SVNSYNC";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Repositories to synchronize, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<Binding>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use svn_sync::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("svn-sync.toml")
    ///     .add_toml_file("/etc/svn-sync/repos.toml")
    ///     .with_env_prefix("SVNSYNC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Rewrites every repository path with `expand`.
    pub fn resolve_paths<F>(&mut self, expand: F)
    where
        F: Fn(&Path) -> PathBuf,
    {
        for binding in &mut self.repositories {
            binding.path = expand(&binding.path);
        }
    }

    /// Checks every binding.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` for an empty path or URL and
    /// `ConfigError::InvalidValue` for a path used by two repositories. A URL
    /// without a recognizable host is only logged.
    pub fn validate(&self) -> SyncResult<()> {
        let mut seen = BTreeSet::new();
        for (index, binding) in self.repositories.iter().enumerate() {
            let section = format!("repositories[{index}]");

            if binding.path.as_os_str().is_empty() {
                return Err(ConfigError::MissingKey {
                    section,
                    key: "path".to_string(),
                }
                .into());
            }
            if binding.url.is_empty() {
                return Err(ConfigError::MissingKey {
                    section,
                    key: "url".to_string(),
                }
                .into());
            }
            // fails only this repository, at EnsureRelocated
            if let Err(e) = extract_host(&binding.url) {
                tracing::warn!(
                    path = %binding.path.display(),
                    url = %binding.url,
                    error = %e,
                    "Repository URL has no recognizable host"
                );
            }
            if !seen.insert(binding.path.as_path()) {
                return Err(ConfigError::InvalidValue {
                    section,
                    key: "path".to_string(),
                    message: format!("'{}' is used by another repository", binding.path.display()),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Repositories whose path is in `only`, or all of them when `only` is
    /// empty.
    #[must_use]
    pub fn select(&self, only: &[PathBuf]) -> Vec<&Binding> {
        self.repositories
            .iter()
            .filter(|b| only.is_empty() || only.iter().any(|p| p == &b.path))
            .collect()
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        let global = &self.global;
        options.insert(
            "global.output_log_level",
            global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level",
            global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file",
            global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("global.log_json", global.log_json.to_string());
        options.insert("global.svn", global.svn.display().to_string());
        options.insert("global.jobs", global.jobs.to_string());
        options.insert(
            "global.command_timeout_secs",
            global.command_timeout_secs.to_string(),
        );

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    /// One line per repository: `path  url  [clean]`.
    #[must_use]
    pub fn format_repositories(&self) -> Vec<String> {
        let width = self
            .repositories
            .iter()
            .map(|b| b.path.display().to_string().len())
            .max()
            .unwrap_or(0);

        self.repositories
            .iter()
            .map(|b| {
                let path = b.path.display().to_string();
                let clean = if b.clean { "  [clean]" } else { "" };
                format!("{path:<width$}  {}{clean}", b.url)
            })
            .collect()
    }
}
