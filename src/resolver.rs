// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-request zrl initialisation.
//!
//! Runs the probe guard for the visiting identity, hands a probe job to the
//! worker when warranted and notifies observers. Nothing here fails the
//! request.

use crate::guard::{ProbeDecision, ProbeGuard};
use crate::jobs::{Job, JobQueue};
use crate::metrics::ZrlMetrics;
use crate::observers::Observers;
use crate::visitor::VisitorContext;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Passed to observers after a probe has been scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZrlInitEvent {
    /// Claimed visitor URL
    pub zrl: String,
    /// Request path being served
    pub url: String,
}

pub struct ZrlResolver {
    guard: ProbeGuard,
    queue: Arc<dyn JobQueue>,
    observers: Observers<ZrlInitEvent>,
    metrics: Option<ZrlMetrics>,
}

impl ZrlResolver {
    pub fn new(guard: ProbeGuard, queue: Arc<dyn JobQueue>) -> Self {
        Self {
            guard,
            queue,
            observers: Observers::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: ZrlMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn observers_mut(&mut self) -> &mut Observers<ZrlInitEvent> {
        &mut self.observers
    }

    /// Initialise zrl handling for one request.
    pub async fn init(&self, ctx: &VisitorContext, request_path: &str) -> ProbeDecision {
        let Some(claimed) = ctx.identity.claimed() else {
            debug!(path = %request_path, "No remote visitor identity");
            return ProbeDecision::invalid();
        };

        let decision = self.guard.should_probe(claimed).await;
        if let Some(metrics) = &self.metrics {
            metrics.record_probe_decision(decision.reason.as_str());
        }

        if !decision.probe {
            debug!(
                visitor = %claimed,
                host = ?decision.host,
                reason = %decision.reason,
                path = %request_path,
                "Possible probe flood, not scheduling"
            );
            return decision;
        }

        let config = self.guard.config();
        let job = Job::new(config.job_name.clone(), vec![claimed.to_string()]);
        match self.queue.enqueue(config.priority, job).await {
            Ok(()) => info!(visitor = %claimed, priority = %config.priority, "Probe scheduled"),
            Err(e) => warn!(visitor = %claimed, error = %e, "Failed to schedule probe"),
        }

        let mut event = ZrlInitEvent {
            zrl: claimed.to_string(),
            url: request_path.to_string(),
        };
        self.observers.notify(&mut event);

        decision
    }
}
