// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Zero-redirect link resolver
//!
//! Lets an authenticated remote visitor's identity travel across federated
//! sites and keeps the visitor probing that goes with it from being abused:
//!
//! - Profile link annotation with the visitor's `zrl` parameter
//! - Scheme/case/slash-insensitive profile link comparison
//! - Probe suppression for hosts cached as feed-only or phantom
//! - Fire-and-forget probe scheduling with observer notification
//! - Profile tabs, reminders and detail fields for the profile page

pub mod annotator;
pub mod cache;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod jobs;
pub mod link;
pub mod metrics;
pub mod network;
pub mod observers;
pub mod profile;
pub mod resolver;
pub mod visitor;

pub use annotator::{LinkRewriteRequest, ZrlAnnotator};
pub use cache::{CacheStore, MemoryCache};
pub use config::Config;
pub use error::{Result, ZrlError};
pub use guard::{ProbeCacheEntry, ProbeDecision, ProbeGuard, ProbeReason};
pub use jobs::{ChannelQueue, Job, JobQueue, Priority};
pub use network::NetworkKind;
pub use resolver::{ZrlInitEvent, ZrlResolver};
pub use visitor::{VisitorContext, VisitorIdentity};
