// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Sync (default) | Check | List | Options | Inis | Version
//! ```

use std::process::ExitCode;

use svn_sync::cli::global::GlobalOptions;
use svn_sync::cli::{self, Command};
use svn_sync::cmd::config::{run_inis_command, run_options_command};
use svn_sync::cmd::list::run_list_command;
use svn_sync::cmd::sync::{run_check_command, run_sync_command};
use svn_sync::config::loader::ConfigLoader;
use svn_sync::config::{Config, ENV_PREFIX, GlobalConfig, LOCAL_CONFIG_FILE};
use svn_sync::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if matches!(cli.command, Some(Command::Version)) {
        handle_version_command();
        return ExitCode::SUCCESS;
    }

    let loader = match build_config_loader(&cli.global) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if matches!(cli.command, Some(Command::Inis)) {
        run_inis_command(&loader.format_loaded_files());
        return ExitCode::SUCCESS;
    }

    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&build_log_config(&config.global)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_file_json(global.log_json)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::List) => {
            run_list_command(config);
            Ok(())
        }
        Some(Command::Check) => run_check_command(config).await,
        Some(Command::Sync(args)) => run_sync_command(args, config).await,
        None => run_sync_command(&cli::sync::SyncArgs::default(), config).await,
        Some(Command::Version | Command::Inis) => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "svn-sync failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> svn_sync::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(LOCAL_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    Ok(loader)
}
