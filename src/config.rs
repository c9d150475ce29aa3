// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the zrl resolver.
//!
//! Defaults match the conventions used by federated peers: the `zrl`
//! parameter name, the `gprobe:` cache namespace and low-priority probe jobs.

use crate::jobs::Priority;
use crate::network::NetworkKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the zrl resolver service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Public base URL of this site, used for local links
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Link annotation configuration
    #[serde(default)]
    pub zrl: ZrlConfig,

    /// Visitor probe configuration
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Link annotation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZrlConfig {
    /// Query parameter carrying the visitor URL (default: zrl)
    #[serde(default = "default_param")]
    pub param: String,

    /// Path segment marking a profile-shaped link (default: /profile/)
    #[serde(default = "default_profile_marker")]
    pub profile_marker: String,
}

/// Visitor probe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Cache key prefix for probe snapshots (default: gprobe:)
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Networks that are never re-probed (default: feed, phantom)
    #[serde(default = "default_low_trust_networks")]
    pub low_trust_networks: Vec<NetworkKind>,

    /// Priority of enqueued probe jobs (default: low)
    #[serde(default)]
    pub priority: Priority,

    /// Job name handed to the worker (default: gprobe)
    #[serde(default = "default_job_name")]
    pub job_name: String,

    /// TTL for probe results reported back to this service (default: 86400)
    #[serde(default = "default_probe_ttl_secs")]
    pub result_ttl_secs: u64,
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for cached birthday rows in seconds (default: 3600)
    #[serde(default = "default_birthday_ttl_secs")]
    pub birthday_ttl_secs: u64,

    /// Interval between expired-entry sweeps in seconds (default: 60)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_param() -> String {
    "zrl".to_string()
}

fn default_profile_marker() -> String {
    "/profile/".to_string()
}

fn default_cache_prefix() -> String {
    "gprobe:".to_string()
}

fn default_low_trust_networks() -> Vec<NetworkKind> {
    vec![NetworkKind::Feed, NetworkKind::Phantom]
}

fn default_job_name() -> String {
    "gprobe".to_string()
}

fn default_probe_ttl_secs() -> u64 {
    86400
}

fn default_birthday_ttl_secs() -> u64 {
    3600 // one hour
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            base_url: default_base_url(),
            zrl: ZrlConfig::default(),
            probe: ProbeConfig::default(),
            cache: CacheConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for ZrlConfig {
    fn default() -> Self {
        Self {
            param: default_param(),
            profile_marker: default_profile_marker(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            cache_prefix: default_cache_prefix(),
            low_trust_networks: default_low_trust_networks(),
            priority: Priority::default(),
            job_name: default_job_name(),
            result_ttl_secs: default_probe_ttl_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            birthday_ttl_secs: default_birthday_ttl_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl ProbeConfig {
    /// Cache key holding the probe snapshot for a host.
    pub fn cache_key(&self, host: &str) -> String {
        format!("{}{}", self.cache_prefix, host.to_lowercase())
    }

    /// Get the probe result TTL
    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }
}

impl CacheConfig {
    /// Get the birthday cache TTL
    pub fn birthday_ttl(&self) -> Duration {
        Duration::from_secs(self.birthday_ttl_secs)
    }

    /// Get the cleanup interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
