// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for flood simulation results.

use std::collections::HashMap;

/// Outcome of one simulated page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Probed,
    Suppressed,
    Rejected,
    CacheFallback,
}

/// Collects outcomes during a flood.
#[derive(Debug, Default)]
pub struct FloodMetrics {
    outcomes: HashMap<Outcome, usize>,
    requests_per_host: HashMap<String, usize>,
    jobs_enqueued: usize,
}

impl FloodMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page view outcome.
    pub fn record(&mut self, outcome: Outcome, host: Option<&str>) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        if let Some(h) = host {
            *self.requests_per_host.entry(h.to_string()).or_insert(0) += 1;
        }
    }

    pub fn set_jobs_enqueued(&mut self, jobs: usize) {
        self.jobs_enqueued = jobs;
    }

    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Ratio of page views that did not produce a probe.
    pub fn suppression_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        let probed = self.count(Outcome::Probed) + self.count(Outcome::CacheFallback);
        (total - probed) as f64 / total as f64
    }

    pub fn report(&self) -> FloodReport {
        FloodReport {
            total_requests: self.total_requests(),
            probed: self.count(Outcome::Probed),
            suppressed: self.count(Outcome::Suppressed),
            rejected: self.count(Outcome::Rejected),
            cache_fallback: self.count(Outcome::CacheFallback),
            jobs_enqueued: self.jobs_enqueued,
            suppression_rate: self.suppression_rate(),
            unique_hosts: self.requests_per_host.len(),
        }
    }
}

/// Summary of a flood run.
#[derive(Debug, Clone)]
pub struct FloodReport {
    pub total_requests: usize,
    pub probed: usize,
    pub suppressed: usize,
    pub rejected: usize,
    pub cache_fallback: usize,
    pub jobs_enqueued: usize,
    pub suppression_rate: f64,
    pub unique_hosts: usize,
}

impl std::fmt::Display for FloodReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Probe Flood Report ===")?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f, "Probed:            {}", self.probed)?;
        writeln!(f, "Suppressed:        {}", self.suppressed)?;
        writeln!(f, "Rejected:          {}", self.rejected)?;
        writeln!(f, "Cache Fallback:    {}", self.cache_fallback)?;
        writeln!(f, "Jobs Enqueued:     {}", self.jobs_enqueued)?;
        writeln!(f, "Suppression Rate:  {:.1}%", self.suppression_rate * 100.0)?;
        writeln!(f, "Unique Hosts:      {}", self.unique_hosts)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppression_rate() {
        let mut metrics = FloodMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Probed, Some("a.example"));
        }
        for _ in 0..7 {
            metrics.record(Outcome::Suppressed, Some("b.example"));
        }

        assert_eq!(metrics.total_requests(), 10);
        assert!((metrics.suppression_rate() - 0.7).abs() < 0.01);
        assert_eq!(metrics.report().unique_hosts, 2);
    }
}
