// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::paths::{absolutize, expand_home, expand_path, expand_vars};
use super::{Binding, Config, ConfigLoader, GlobalConfig};
use crate::logging::LogLevel;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn lookup(name: &str) -> Option<String> {
    match name {
        "HOME" => Some("/home/alice".to_string()),
        "REPO" => Some("abyss".to_string()),
        "USERPROFILE" => Some("C:/Users/alice".to_string()),
        _ => None,
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();
    insta::assert_yaml_snapshot!(config, @r#"
    global:
      output_log_level: 3
      file_log_level: 4
      log_json: false
      svn: svn
      jobs: 0
      command_timeout_secs: 0
    "#);
}

#[test]
fn test_expand_vars_forms() {
    let cases: Vec<(&str, String)> = [
        "$HOME/svn",
        "${HOME}/svn/${REPO}",
        "%USERPROFILE%/svn",
        "$UNKNOWN/svn",
        "/plain/path",
        "cost$",
    ]
    .into_iter()
    .map(|raw| (raw, expand_vars(raw, lookup).into_owned()))
    .collect();

    insta::assert_debug_snapshot!(cases, @r#"
    [
        (
            "$HOME/svn",
            "/home/alice/svn",
        ),
        (
            "${HOME}/svn/${REPO}",
            "/home/alice/svn/abyss",
        ),
        (
            "%USERPROFILE%/svn",
            "C:/Users/alice/svn",
        ),
        (
            "$UNKNOWN/svn",
            "$UNKNOWN/svn",
        ),
        (
            "/plain/path",
            "/plain/path",
        ),
        (
            "cost$",
            "cost$",
        ),
    ]
    "#);
}

#[test]
fn test_expand_home() {
    let home = Path::new("/home/alice");
    assert_eq!(expand_home("~", Some(home)), PathBuf::from("/home/alice"));
    assert_eq!(
        expand_home("~/svn/a", Some(home)),
        PathBuf::from("/home/alice/svn/a")
    );
    assert_eq!(expand_home("~bob/svn", Some(home)), PathBuf::from("~bob/svn"));
    assert_eq!(expand_home("svn/~", Some(home)), PathBuf::from("svn/~"));
    assert_eq!(expand_home("~/svn", None), PathBuf::from("~/svn"));
}

#[cfg(unix)]
#[test]
fn test_absolutize_folds_dots() {
    let cwd = Path::new("/srv/sync");
    assert_eq!(absolutize(Path::new("a/./b"), cwd), PathBuf::from("/srv/sync/a/b"));
    assert_eq!(absolutize(Path::new("../x"), cwd), PathBuf::from("/srv/x"));
    assert_eq!(absolutize(Path::new("/abs/../y"), cwd), PathBuf::from("/y"));
    assert_eq!(absolutize(Path::new("/../.."), cwd), PathBuf::from("/"));
}

#[cfg(unix)]
#[test]
fn test_expand_path_pipeline() {
    let home = Path::new("/home/alice");
    let cwd = Path::new("/srv/sync");
    let expanded = |raw: &str| expand_path(Path::new(raw), lookup, Some(home), cwd);

    assert_eq!(expanded("$HOME/svn/$REPO"), PathBuf::from("/home/alice/svn/abyss"));
    assert_eq!(expanded("~/svn"), PathBuf::from("/home/alice/svn"));
    assert_eq!(expanded("work/${REPO}"), PathBuf::from("/srv/sync/work/abyss"));
}

#[cfg(unix)]
#[test]
fn test_config_parse_repositories() {
    let config = ConfigLoader::new()
        .add_toml_str(
            r#"
[global]
output_log_level = 4
jobs = 3

[[repositories]]
path = "/svn/trunk/abyss"
url = "http://svn.example.com/svn/Abyss/trunk/Abyss"
clean = true

[[repositories]]
path = "relative/tools"
url = "svn://svn.example.com/tools/trunk"
"#,
        )
        .with_cwd("/srv/sync")
        .build()
        .unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.global.effective_jobs(), 3);
    insta::assert_debug_snapshot!(config.repositories, @r#"
    [
        Binding {
            path: "/svn/trunk/abyss",
            url: "http://svn.example.com/svn/Abyss/trunk/Abyss",
            clean: true,
        },
        Binding {
            path: "/srv/sync/relative/tools",
            url: "svn://svn.example.com/tools/trunk",
            clean: false,
        },
    ]
    "#);
}

#[test]
fn test_config_rejects_unknown_keys() {
    let err = Config::parse(
        r#"
[[repositories]]
path = "/a"
url = "https://svn.example.com/repo"
branch = "trunk"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("branch"), "{err}");
}

#[test]
fn test_config_rejects_missing_url() {
    assert!(Config::parse("[[repositories]]\npath = \"/a\"\n").is_err());
}

#[cfg(unix)]
#[test]
fn test_config_keeps_malformed_url() {
    let config = Config::parse(
        r#"
[[repositories]]
path = "/a"
url = "https://svn.example.com/repo/trunk"

[[repositories]]
path = "/b"
url = "not-a-url"
"#,
    )
    .unwrap();

    assert_eq!(config.repositories.len(), 2);
    assert_eq!(config.repositories[1].url, "not-a-url");
}

#[cfg(unix)]
#[test]
fn test_config_rejects_duplicate_paths() {
    let err = Config::parse(
        r#"
[[repositories]]
path = "/a"
url = "https://svn.example.com/repo/trunk"

[[repositories]]
path = "/b/../a"
url = "https://svn.example.com/repo/branches/b1"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("used by another repository"), "{err}");
}

#[test]
fn test_config_loader_overrides() {
    let config = ConfigLoader::new()
        .add_toml_str("[global]\njobs = 8\nsvn = \"svn\"")
        .set("global.jobs", 2_i64)
        .unwrap()
        .set_opt("global.svn", Some("/opt/svn/bin/svn"))
        .unwrap()
        .set_opt::<i64>("global.command_timeout_secs", None)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.global.jobs, 2);
    assert_eq!(config.global.svn, PathBuf::from("/opt/svn/bin/svn"));
    assert_eq!(config.global.command_timeout(), None);
}

#[test]
fn test_command_timeout() {
    let global = GlobalConfig {
        command_timeout_secs: 90,
        ..GlobalConfig::default()
    };
    assert_eq!(global.command_timeout(), Some(Duration::from_secs(90)));
}

#[test]
fn test_config_loader_format_loaded_files() {
    let loader = ConfigLoader::new()
        .add_toml_str("[global]\n jobs = 1")
        .add_toml_file_optional("/nonexistent/svn-sync.toml")
        .add_toml_file("/etc/svn-sync/repos.toml");

    insta::assert_debug_snapshot!(loader.format_loaded_files(), @r#"
    [
        "1. [string] <string>",
        "2. [file] /etc/svn-sync/repos.toml",
    ]
    "#);
}

#[test]
fn test_select_only() {
    let config = Config {
        repositories: vec![
            Binding {
                path: PathBuf::from("/a"),
                url: "https://svn.example.com/repo/a".to_string(),
                clean: false,
            },
            Binding {
                path: PathBuf::from("/b"),
                url: "https://svn.example.com/repo/b".to_string(),
                clean: false,
            },
        ],
        ..Config::default()
    };

    assert_eq!(config.select(&[]).len(), 2);
    let only = config.select(&[PathBuf::from("/b")]);
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].path, PathBuf::from("/b"));
}

#[test]
fn test_format_options() {
    insta::assert_debug_snapshot!(Config::default().format_options(), @r#"
    [
        "global.command_timeout_secs = 0",
        "global.file_log_level       = 4",
        "global.jobs                 = 0",
        "global.log_file             = ",
        "global.log_json             = false",
        "global.output_log_level     = 3",
        "global.svn                  = svn",
    ]
    "#);
}

#[test]
fn test_format_repositories() {
    let config = Config {
        repositories: vec![
            Binding {
                path: PathBuf::from("/svn/abyss"),
                url: "https://svn.example.com/repo/trunk".to_string(),
                clean: true,
            },
            Binding {
                path: PathBuf::from("/svn/t"),
                url: "svn://svn.example.com/tools".to_string(),
                clean: false,
            },
        ],
        ..Config::default()
    };

    insta::assert_debug_snapshot!(config.format_repositories(), @r#"
    [
        "/svn/abyss  https://svn.example.com/repo/trunk  [clean]",
        "/svn/t      svn://svn.example.com/tools",
    ]
    "#);
}
