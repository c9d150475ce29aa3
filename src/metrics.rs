// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for annotation and probe decisions.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Service metrics.
#[derive(Clone)]
pub struct ZrlMetrics {
    registry: Registry,
    annotations: IntCounterVec,
    probe_decisions: IntCounterVec,
}

impl ZrlMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let annotations = IntCounterVec::new(
            Opts::new("zrl_annotations_total", "Profile links processed by the annotator"),
            &["outcome"],
        )?;
        let probe_decisions = IntCounterVec::new(
            Opts::new("zrl_probe_decisions_total", "Visitor probe guard decisions"),
            &["reason"],
        )?;

        registry.register(Box::new(annotations.clone()))?;
        registry.register(Box::new(probe_decisions.clone()))?;

        Ok(Self {
            registry,
            annotations,
            probe_decisions,
        })
    }

    /// Count an annotator call; `annotated` is whether a parameter was added.
    pub fn record_annotation(&self, annotated: bool) {
        let outcome = if annotated { "annotated" } else { "unchanged" };
        self.annotations.with_label_values(&[outcome]).inc();
    }

    pub fn record_probe_decision(&self, reason: &str) {
        self.probe_decisions.with_label_values(&[reason]).inc();
    }

    pub fn probe_decision_count(&self, reason: &str) -> u64 {
        self.probe_decisions.with_label_values(&[reason]).get()
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
