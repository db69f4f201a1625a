// svn-sync: Subversion working-copy synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::signal::is_not_working_copy;
use super::test_utils::FakeSvn;
use super::url::{extract_host, same_host};
use super::{InfoItem, SvnCli, WorkingCopy};

#[test]
fn test_extract_host_supported_schemes() {
    let hosts: Vec<(&str, &str)> = [
        "https://svn.example.com/repo/trunk",
        "http://svn.example.com/repo",
        "svn://10.0.0.5/repo/branches/b1",
        "svn://svn.example.com:3690/repo",
    ]
    .into_iter()
    .map(|url| (url, extract_host(url).unwrap_or("<error>")))
    .collect();

    insta::assert_debug_snapshot!(hosts, @r#"
    [
        (
            "https://svn.example.com/repo/trunk",
            "svn.example.com",
        ),
        (
            "http://svn.example.com/repo",
            "svn.example.com",
        ),
        (
            "svn://10.0.0.5/repo/branches/b1",
            "10.0.0.5",
        ),
        (
            "svn://svn.example.com:3690/repo",
            "svn.example.com:3690",
        ),
    ]
    "#);
}

#[test]
fn test_extract_host_rejects_malformed() {
    for url in [
        "not-a-url",
        "svn://hostonly",
        "ftp://svn.example.com/repo",
        "file:///var/svn/repo",
        "http:///x/y",
        "",
    ] {
        assert!(extract_host(url).is_err(), "{url} should be rejected");
    }
}

#[test]
fn test_extract_host_error_message() {
    let err = extract_host("not-a-url").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"cannot extract host from 'not-a-url' (expected svn|http|https://host/path)");
}

#[test]
fn test_same_host_ignores_path() {
    assert!(
        same_host(
            "https://svn.example.com/repo/trunk",
            "https://svn.example.com/repo/branches/b1"
        )
        .unwrap()
    );
    assert!(
        !same_host(
            "https://old.example.com/repo/trunk",
            "https://new.example.com/repo/trunk"
        )
        .unwrap()
    );
    assert!(same_host("https://svn.example.com/repo", "garbage").is_err());
}

#[test]
fn test_not_working_copy_detection() {
    assert!(is_not_working_copy(
        "svn: E155007: '/work/a' is not a working copy"
    ));
    assert!(!is_not_working_copy(
        "svn: E170013: Unable to connect to a repository"
    ));
    assert!(!is_not_working_copy(""));
}

#[test]
fn test_info_item_arguments() {
    assert_eq!(InfoItem::ReposRootUrl.as_str(), "repos-root-url");
    assert_eq!(InfoItem::Url.as_str(), "url");
}

#[tokio::test]
async fn test_working_copy_command_shapes() {
    let dir = Path::new("/work/a");
    let svn = FakeSvn::new();
    let wc = WorkingCopy::new(&svn, dir);

    wc.checkout("https://svn.example.com/repo/trunk")
        .await
        .unwrap();
    wc.cleanup().await.unwrap();
    wc.switch("https://svn.example.com/repo/branches/b1")
        .await
        .unwrap();
    wc.relocate("https://mirror.example.com/repo").await.unwrap();
    wc.remove_unversioned().await.unwrap();
    wc.revert_all().await.unwrap();
    wc.update().await.unwrap();

    insta::assert_debug_snapshot!(svn.calls(dir), @r#"
    [
        "checkout --force https://svn.example.com/repo/trunk .",
        "cleanup",
        "switch https://svn.example.com/repo/branches/b1",
        "relocate https://mirror.example.com/repo",
        "cleanup --remove-unversioned --remove-ignored",
        "revert --recursive --remove-added .",
        "update",
    ]
    "#);
}

#[tokio::test]
async fn test_info_item_strips_newline() {
    let dir = Path::new("/work/a");
    let svn = FakeSvn::new().with_copy(dir, "https://svn.example.com/repo/trunk");
    let wc = WorkingCopy::new(&svn, dir);

    assert_eq!(
        wc.info_item(InfoItem::ReposRootUrl).await.unwrap(),
        "https://svn.example.com/repo"
    );
    assert_eq!(
        wc.info_item(InfoItem::Url).await.unwrap(),
        "https://svn.example.com/repo/trunk"
    );
}

#[tokio::test]
async fn test_info_outside_working_copy() {
    let dir = Path::new("/work/empty");
    let svn = FakeSvn::new();
    let err = WorkingCopy::new(&svn, dir).info().await.unwrap_err();

    assert!(err.is_not_working_copy());
}

#[tokio::test]
async fn test_relocate_keeps_path_and_changes_host() {
    let dir = Path::new("/work/a");
    let svn = FakeSvn::new().with_copy(dir, "https://old.example.com/repo/trunk");
    WorkingCopy::new(&svn, dir)
        .relocate("https://new.example.com/repo")
        .await
        .unwrap();

    let copy = svn.copy(dir).unwrap();
    assert_eq!(copy.root, "https://new.example.com/repo");
    assert_eq!(copy.url, "https://new.example.com/repo/trunk");
}

#[test]
fn test_svn_cli_defaults() {
    let cli = SvnCli::new("svn");
    assert_eq!(cli.program(), Path::new("svn"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_svn_cli_missing_program() {
    use super::SvnExecutor;

    let cli = SvnCli::new("svn-sync-definitely-not-installed");
    let err = cli.version().await.unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"svn executable not found: 'svn-sync-definitely-not-installed'"
    );
}
