// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Background job hand-off.
//!
//! Jobs are fire-and-forget: the resolver enqueues and never waits for the
//! result. Execution (and its at-least-once semantics) belongs to the worker
//! on the receiving end of the queue.

use crate::error::{Result, ZrlError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Job priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Normal,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Normal => write!(f, "normal"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// A named job with string arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub args: Vec<String>,
}

impl Job {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A job together with the priority it was enqueued at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedJob {
    pub priority: Priority,
    pub job: Job,
}

/// Background job collaborator.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, priority: Priority, job: Job) -> Result<()>;
}

/// Queue backed by an unbounded tokio channel.
#[derive(Clone)]
pub struct ChannelQueue {
    tx: mpsc::UnboundedSender<QueuedJob>,
}

impl ChannelQueue {
    /// Create a queue and the receiver the worker drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QueuedJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl JobQueue for ChannelQueue {
    async fn enqueue(&self, priority: Priority, job: Job) -> Result<()> {
        debug!(job = %job.name, %priority, "Enqueueing job");
        self.tx
            .send(QueuedJob { priority, job })
            .map_err(|e| ZrlError::Enqueue(format!("worker channel closed: {}", e.0.job.name)))
    }
}
