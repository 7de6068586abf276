// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn editors() -> PathPrefixAuthorization {
    PathPrefixAuthorization::new(vec![
        AccessRule::new("editor", "/content/site"),
        AccessRule::new("admin", "/"),
    ])
}

#[parameterized(
    exact = { "editor", "/content/site", true },
    descendant = { "editor", "/content/site/page", true },
    sibling_name = { "editor", "/content/sitemap", false },
    parent = { "editor", "/content", false },
    other_principal = { "guest", "/content/site/page", false },
    root_rule = { "admin", "/anything/at/all", true },
)]
fn rule_coverage(principal: &str, path: &str, expected: bool) {
    let covered = editors()
        .rules()
        .iter()
        .any(|rule| rule.covers(principal, path));
    assert_eq!(covered, expected);
}

#[test]
fn trailing_slash_on_prefix_is_ignored() {
    let rule = AccessRule::new("editor", "/content/site/");
    assert!(rule.covers("editor", "/content/site"));
    assert!(rule.covers("editor", "/content/site/page"));
}

#[parameterized(
    add = { Action::Add },
    delete = { Action::Delete },
)]
fn every_path_must_be_covered(action: Action) {
    let ctx = ExecutionContext::new("editor");
    let allowed = ReplicationRequest::new(action, ["/content/site/a", "/content/site/b"]);
    let mixed = ReplicationRequest::new(action, ["/content/site/a", "/etc/secret"]);

    assert!(editors().check_permission(&ctx, &allowed).is_ok());
    let err = editors().check_permission(&ctx, &mixed).unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(ref msg) if msg.contains("/etc/secret")));
}

#[test]
fn poll_is_always_permitted() {
    let ctx = ExecutionContext::new("nobody");
    let request = ReplicationRequest::new(Action::Poll, ["/etc/secret"]);
    assert!(editors().check_permission(&ctx, &request).is_ok());
}

#[test]
fn no_rules_denies_add() {
    let ctx = ExecutionContext::new("editor");
    let request = ReplicationRequest::new(Action::Add, ["/content/site"]);
    assert!(PathPrefixAuthorization::default()
        .check_permission(&ctx, &request)
        .is_err());
}

#[test]
fn allow_all_permits_anything() {
    let ctx = ExecutionContext::new("nobody");
    let request = ReplicationRequest::new(Action::Delete, ["/etc/secret"]);
    assert!(AllowAll.check_permission(&ctx, &request).is_ok());
}
