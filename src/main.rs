// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Zero-redirect link resolver service
//!
//! Annotates outgoing profile links with the visiting identity and guards the
//! visitor probe path against forged-identity floods.
//!
//! ## Usage
//!
//! The page renderer calls the service per request:
//!
//! 1. `POST /zrl/init` with the visitor's claimed URL; a probe job is handed
//!    to the worker unless the host is cached as feed-only or phantom.
//!
//! 2. `POST /zrl/annotate` for each outgoing profile link.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `BASE_URL`: Public base URL of this site (default: http://localhost:8080)
//! - `PROBE_PRIORITY`: Priority of probe jobs, low/normal/high (default: low)
//! - `LOW_TRUST_NETWORKS`: Comma-separated network codes never re-probed (default: feed,phnt)
//! - `CACHE_CLEANUP_SECS`: Expired cache entry sweep interval (default: 60)
//! - `METRICS_ENABLED`: Expose Prometheus metrics (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use zrl_resolver::{
    cache::MemoryCache,
    config::Config,
    handlers::{router, AppState},
    jobs::ChannelQueue,
    network::NetworkKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        base_url = %config.base_url,
        probe_priority = %config.probe.priority,
        low_trust = ?config.probe.low_trust_networks,
        cleanup_secs = config.cache.cleanup_interval_secs,
        metrics = config.metrics.enabled,
        "Starting zrl resolver"
    );

    let cache = MemoryCache::new();
    let (queue, mut jobs) = ChannelQueue::new();
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(cache.clone()),
        Arc::new(queue),
    )?);

    // Spawn cleanup task
    let cleanup_interval = config.cache.cleanup_interval().max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });

    // Hand queued jobs to the worker
    tokio::spawn(async move {
        while let Some(queued) = jobs.recv().await {
            info!(
                job = %queued.job.name,
                priority = %queued.priority,
                args = ?queued.job.args,
                "Dispatching job to worker"
            );
        }
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = Config::default();
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        base_url: std::env::var("BASE_URL").unwrap_or(defaults.base_url),
        probe: zrl_resolver::config::ProbeConfig {
            priority: std::env::var("PROBE_PRIORITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            low_trust_networks: std::env::var("LOW_TRUST_NETWORKS")
                .map(|v| NetworkKind::parse_list(&v))
                .unwrap_or(defaults.probe.low_trust_networks),
            ..defaults.probe
        },
        cache: zrl_resolver::config::CacheConfig {
            cleanup_interval_secs: std::env::var("CACHE_CLEANUP_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache.cleanup_interval_secs),
            ..defaults.cache
        },
        metrics: zrl_resolver::config::MetricsConfig {
            enabled: std::env::var("METRICS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics.enabled),
            ..defaults.metrics
        },
        ..defaults
    }
}

