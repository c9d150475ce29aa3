// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Flood patterns for probe-guard testing.

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Total number of page views to simulate
    pub total_requests: usize,
    /// Hosts cached as feed-only
    pub feed_hosts: usize,
    /// Hosts with no cached classification
    pub unknown_hosts: usize,
    /// Fraction of requests claiming a feed host (0.0-1.0)
    pub feed_ratio: f64,
    /// Fraction of requests carrying a malformed claim (0.0-1.0)
    pub malformed_ratio: f64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            feed_hosts: 1,
            unknown_hosts: 1,
            feed_ratio: 0.0,
            malformed_ratio: 0.0,
        }
    }
}

/// Predefined flood patterns.
impl FloodConfig {
    /// Forged claims all pointing at one known feed host.
    pub fn single_feed_host_flood() -> Self {
        Self {
            total_requests: 500,
            feed_hosts: 1,
            feed_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Forged claims spread across many known feed hosts.
    pub fn distributed_feed_flood() -> Self {
        Self {
            total_requests: 500,
            feed_hosts: 100,
            feed_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Garbage identities.
    pub fn malformed_claims() -> Self {
        Self {
            total_requests: 200,
            malformed_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Legitimate visitors mixed with forged feed claims.
    pub fn mixed_traffic() -> Self {
        Self {
            total_requests: 300,
            feed_hosts: 10,
            unknown_hosts: 20,
            feed_ratio: 0.5,
            ..Default::default()
        }
    }
}

/// Deterministic "random" choice based on index and ratio.
pub fn rand_bool(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}
