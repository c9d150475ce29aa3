// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Visitor probe guard.
//!
//! Every page view by a remote visitor would normally schedule a probe of the
//! claimed profile URL. Forged claims pointing at hosts already classified as
//! feed-only or phantom are a cheap way to flood the worker, so those are
//! answered from the cached probe snapshot instead.
//!
//! Malformed input fails closed (no probe); cache trouble fails open.

use crate::cache::CacheStore;
use crate::config::ProbeConfig;
use crate::error::{Result, ZrlError};
use crate::network::NetworkKind;
use crate::visitor::validate_url;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Last known classification of a remote host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCacheEntry {
    pub host: String,
    pub network: NetworkKind,
    pub cached_at: DateTime<Utc>,
}

/// Why the guard decided as it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeReason {
    InvalidUrl,
    KnownLowTrustHost,
    UnknownOrTrustedHost,
    CacheUnavailable,
}

impl ProbeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid-url",
            Self::KnownLowTrustHost => "known-low-trust-host",
            Self::UnknownOrTrustedHost => "unknown-or-trusted-host",
            Self::CacheUnavailable => "cache-unavailable",
        }
    }
}

impl std::fmt::Display for ProbeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guard verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeDecision {
    pub probe: bool,
    pub reason: ProbeReason,
    /// Host extracted from the visitor URL, when it parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl ProbeDecision {
    fn skip(reason: ProbeReason, host: Option<String>) -> Self {
        Self {
            probe: false,
            reason,
            host,
        }
    }

    fn allow(reason: ProbeReason, host: String) -> Self {
        Self {
            probe: true,
            reason,
            host: Some(host),
        }
    }

    pub fn invalid() -> Self {
        Self::skip(ProbeReason::InvalidUrl, None)
    }
}

/// Decides whether a claimed visitor URL is worth probing.
pub struct ProbeGuard {
    config: ProbeConfig,
    cache: Arc<dyn CacheStore>,
}

impl ProbeGuard {
    pub fn new(config: ProbeConfig, cache: Arc<dyn CacheStore>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Read-only decision over the current cache snapshot.
    pub async fn should_probe(&self, visitor_url: &str) -> ProbeDecision {
        let url = match validate_url(visitor_url) {
            Ok(url) => url,
            Err(_) => return ProbeDecision::invalid(),
        };

        let Some(host) = url.host_str().map(str::to_lowercase) else {
            return ProbeDecision::invalid();
        };

        match self.cached_network(&host).await {
            Ok(Some(network)) if self.config.low_trust_networks.contains(&network) => {
                debug!(%host, %network, "Probe suppressed for known low-trust host");
                ProbeDecision::skip(ProbeReason::KnownLowTrustHost, Some(host))
            }
            Ok(_) => ProbeDecision::allow(ProbeReason::UnknownOrTrustedHost, host),
            Err(e) => {
                warn!(%host, error = %e, "Probe cache lookup failed, allowing probe");
                ProbeDecision::allow(ProbeReason::CacheUnavailable, host)
            }
        }
    }

    async fn cached_network(&self, host: &str) -> Result<Option<NetworkKind>> {
        let key = self.config.cache_key(host);
        let Some(value) = self.cache.get(&key).await? else {
            return Ok(None);
        };

        let entry: ProbeCacheEntry =
            serde_json::from_value(value).map_err(|e| ZrlError::Decode {
                key,
                reason: e.to_string(),
            })?;
        Ok(Some(entry.network))
    }
}

/// Canonical form of a host name as it appears in a parsed URL: lowercase,
/// IDNA-encoded, IPv6 in brackets.
pub fn canonical_host(raw: &str) -> Result<String> {
    url::Host::parse(raw.trim())
        .map(|host| host.to_string())
        .map_err(|_| ZrlError::InvalidHost {
            host: raw.to_string(),
        })
}

/// Store a probe result reported by the probe job.
pub async fn record_probe_result(
    cache: &dyn CacheStore,
    config: &ProbeConfig,
    host: &str,
    network: NetworkKind,
) -> Result<ProbeCacheEntry> {
    let host = canonical_host(host)?;
    let key = config.cache_key(&host);
    let entry = ProbeCacheEntry {
        host,
        network,
        cached_at: Utc::now(),
    };
    let value = serde_json::to_value(&entry).map_err(|e| ZrlError::Decode {
        key: key.clone(),
        reason: e.to_string(),
    })?;
    cache.set(&key, value, config.result_ttl()).await?;
    debug!(host = %entry.host, network = %network, "Recorded probe result");
    Ok(entry)
}
