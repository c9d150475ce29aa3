// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the zrl resolver.

use std::sync::Arc;
use zrl_resolver::{
    annotator::{LinkRewriteRequest, ZrlAnnotator},
    cache::{CacheStore, MemoryCache},
    config::{Config, ProbeConfig},
    guard::{record_probe_result, ProbeGuard, ProbeReason},
    jobs::{ChannelQueue, Priority},
    link,
    network::NetworkKind,
    profile::{self, TabContext},
    resolver::ZrlResolver,
    visitor::{VisitorContext, VisitorIdentity},
};

#[test]
fn test_annotation_properties() {
    let annotator = ZrlAnnotator::default();

    // Non-profile links pass through for any visitor
    for url in ["http://x/photos/bob", "https://x/display/1", "http://x/"] {
        for visitor in [None, Some("http://y/me"), Some("garbage")] {
            assert_eq!(annotator.annotate(url, false, visitor), url);
        }
    }

    // No visitor, no change
    for url in ["http://x/profile/bob", "http://x/profile/bob?x=1", ""] {
        assert_eq!(annotator.annotate(url, false, None), url);
    }

    assert_eq!(
        annotator.annotate("http://x/profile/bob", false, Some("http://x/profile/bob")),
        "http://x/profile/bob"
    );
    assert_eq!(
        annotator.annotate("http://x/profile/bob", false, Some("http://y/me")),
        "http://x/profile/bob?zrl=http%3A%2F%2Fy%2Fme"
    );
    assert_eq!(
        annotator.annotate("http://x/profile/bob?x=1", false, Some("http://y/me")),
        "http://x/profile/bob?x=1&zrl=http%3A%2F%2Fy%2Fme"
    );
}

#[test]
fn test_custom_param_name() {
    let mut config = Config::default();
    config.zrl.param = "owt".to_string();
    let annotator = ZrlAnnotator::new(config.zrl);

    let result = annotator.rewrite(
        &LinkRewriteRequest {
            target_url: "https://x/profile/bob".into(),
            force_trailing_slash: false,
        },
        &VisitorIdentity::remote("https://y/profile/me"),
    );
    assert_eq!(result.url, "https://x/profile/bob?owt=https%3A%2F%2Fy%2Fprofile%2Fme");
}

#[tokio::test]
async fn test_probe_properties() {
    let cache = Arc::new(MemoryCache::new());
    let config = ProbeConfig::default();
    record_probe_result(cache.as_ref(), &config, "feedhost.example", NetworkKind::Feed)
        .await
        .unwrap();
    let guard = ProbeGuard::new(config, cache);

    let decision = guard.should_probe("http://feedhost.example/u").await;
    assert!(!decision.probe);
    assert_eq!(decision.reason.as_str(), "known-low-trust-host");

    let decision = guard.should_probe("http://unknown.example/u").await;
    assert!(decision.probe);
    assert_eq!(decision.reason.as_str(), "unknown-or-trusted-host");

    assert!(!guard.should_probe("not a url").await.probe);
}

#[tokio::test]
async fn test_probe_snapshot_written_by_worker_is_read_by_guard() {
    let cache = Arc::new(MemoryCache::new());
    let config = ProbeConfig::default();
    let entry = record_probe_result(cache.as_ref(), &config, "Ghost.Example", NetworkKind::Phantom)
        .await
        .unwrap();
    assert_eq!(entry.host, "ghost.example");

    let stored = cache.get("gprobe:ghost.example").await.unwrap().unwrap();
    assert_eq!(stored["network"], "phnt");
}

#[tokio::test]
async fn test_configured_priority_reaches_worker() {
    let cache = Arc::new(MemoryCache::new());
    let config = ProbeConfig {
        priority: Priority::High,
        ..Default::default()
    };
    let (queue, mut rx) = ChannelQueue::new();
    let resolver = ZrlResolver::new(ProbeGuard::new(config, cache), Arc::new(queue));

    let decision = resolver
        .init(&VisitorContext::remote("https://pod.example/profile/me"), "profile/bob")
        .await;
    assert_eq!(decision.reason, ProbeReason::UnknownOrTrustedHost);

    let queued = rx.recv().await.unwrap();
    assert_eq!(queued.priority, Priority::High);
}

#[test]
fn test_link_comparison_used_for_self_links() {
    assert!(link::equivalent("https://x/profile/bob/", "HTTP://X/profile/bob"));
    assert!(!link::equivalent("https://x/profile/bob", "https://x/profile/bob?tab=profile"));
}

#[test]
fn test_profile_page_for_remote_visitor() {
    let annotator = ZrlAnnotator::default();
    let visitor = VisitorIdentity::remote("https://pod.example/profile/me");
    let ctx = TabContext {
        module: "profile".into(),
        profile_loaded: true,
        ..Default::default()
    };

    let tabs = profile::profile_tabs("https://local.example", "bob", &ctx);
    let status = annotator.annotate(&tabs[0].url, false, visitor.claimed());
    assert_eq!(
        status,
        "https://local.example/profile/bob?zrl=https%3A%2F%2Fpod.example%2Fprofile%2Fme"
    );

    // Photos tab is not profile-shaped
    assert_eq!(
        annotator.annotate(&tabs[2].url, false, visitor.claimed()),
        "https://local.example/photos/bob"
    );
}

#[test]
fn test_guard_from_sync_context() {
    let guard = ProbeGuard::new(ProbeConfig::default(), Arc::new(MemoryCache::new()));
    let decision = tokio_test::block_on(guard.should_probe("https://pod.example/profile/me"));
    assert!(decision.probe);
    assert_eq!(decision.host.as_deref(), Some("pod.example"));
}
