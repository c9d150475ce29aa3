// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse tests for the visitor probe path.
//!
//! These tests flood the resolver with forged visitor identities and check
//! that only claims worth probing reach the worker.

mod harness;

use harness::{
    attacks::{rand_bool, FloodConfig},
    generators,
    metrics::{FloodMetrics, Outcome},
};
use std::sync::Arc;
use zrl_resolver::{
    cache::MemoryCache,
    config::ProbeConfig,
    guard::{record_probe_result, ProbeGuard, ProbeReason},
    jobs::ChannelQueue,
    network::NetworkKind,
    resolver::ZrlResolver,
    visitor::VisitorContext,
    ZrlAnnotator,
};

/// Run a flood against a fresh resolver.
async fn run_flood(config: &FloodConfig) -> FloodMetrics {
    let cache = Arc::new(MemoryCache::new());
    let probe_config = ProbeConfig::default();

    let feed_hosts = generators::generate_feed_hosts(config.feed_hosts);
    for host in &feed_hosts {
        record_probe_result(cache.as_ref(), &probe_config, host, NetworkKind::Feed)
            .await
            .unwrap();
    }
    let unknown_hosts = generators::generate_unknown_hosts(config.unknown_hosts);

    let feed_claims = generators::generate_visitor_urls(&feed_hosts, config.total_requests);
    let unknown_claims = generators::generate_visitor_urls(&unknown_hosts, config.total_requests);
    let malformed = generators::generate_malformed_urls();

    let (queue, mut rx) = ChannelQueue::new();
    let resolver = ZrlResolver::new(ProbeGuard::new(probe_config, cache), Arc::new(queue));

    let mut metrics = FloodMetrics::new();
    for i in 0..config.total_requests {
        let claim = if rand_bool(config.malformed_ratio, i) {
            malformed[i % malformed.len()].to_string()
        } else if rand_bool(config.feed_ratio, i) {
            feed_claims[i].clone()
        } else {
            unknown_claims[i].clone()
        };

        let decision = resolver
            .init(&VisitorContext::remote(claim), "profile/bob")
            .await;

        let outcome = match decision.reason {
            ProbeReason::UnknownOrTrustedHost => Outcome::Probed,
            ProbeReason::KnownLowTrustHost => Outcome::Suppressed,
            ProbeReason::InvalidUrl => Outcome::Rejected,
            ProbeReason::CacheUnavailable => Outcome::CacheFallback,
        };
        metrics.record(outcome, decision.host.as_deref());
    }

    let mut jobs = 0;
    while rx.try_recv().is_ok() {
        jobs += 1;
    }
    metrics.set_jobs_enqueued(jobs);
    metrics
}

#[tokio::test]
async fn test_single_feed_host_flood() {
    let report = run_flood(&FloodConfig::single_feed_host_flood()).await.report();
    println!("{}", report);

    assert_eq!(report.suppressed, report.total_requests);
    assert_eq!(report.jobs_enqueued, 0);
}

#[tokio::test]
async fn test_distributed_feed_flood() {
    let report = run_flood(&FloodConfig::distributed_feed_flood()).await.report();
    println!("{}", report);

    assert_eq!(report.unique_hosts, 100);
    assert_eq!(report.jobs_enqueued, 0);
    assert!((report.suppression_rate - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_malformed_claims_never_probed() {
    let report = run_flood(&FloodConfig::malformed_claims()).await.report();
    println!("{}", report);

    assert_eq!(report.rejected, report.total_requests);
    assert_eq!(report.jobs_enqueued, 0);
}

#[tokio::test]
async fn test_mixed_traffic_probes_only_unknown_hosts() {
    let report = run_flood(&FloodConfig::mixed_traffic()).await.report();
    println!("{}", report);

    assert!(report.suppressed > 0);
    assert!(report.probed > 0);
    assert_eq!(report.probed + report.suppressed, report.total_requests);
    // One job per probe decision, none for suppressed claims
    assert_eq!(report.jobs_enqueued, report.probed);
}

#[tokio::test]
async fn test_malformed_claims_never_echoed_into_links() {
    let annotator = ZrlAnnotator::default();
    let target = "https://local.example/profile/bob";

    for claim in generators::generate_malformed_urls() {
        assert_eq!(
            annotator.annotate(target, false, Some(claim)),
            target,
            "Malformed claim {:?} should not be echoed",
            claim
        );
    }
}

#[tokio::test]
async fn test_phantom_reclassification_stops_probing() {
    let cache = Arc::new(MemoryCache::new());
    let config = ProbeConfig::default();
    let guard = ProbeGuard::new(config.clone(), cache.clone());
    let claim = "https://flaky.example/profile/x";

    assert!(guard.should_probe(claim).await.probe);

    record_probe_result(cache.as_ref(), &config, "flaky.example", NetworkKind::Phantom)
        .await
        .unwrap();
    assert!(!guard.should_probe(claim).await.probe);

    // A later successful probe restores it
    record_probe_result(cache.as_ref(), &config, "flaky.example", NetworkKind::Diaspora)
        .await
        .unwrap();
    assert!(guard.should_probe(claim).await.probe);
}
