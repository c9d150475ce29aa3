// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for zrl resolution.
//!
//! None of these reach the caller of the annotator or the probe guard; they
//! are produced by collaborators (cache, job queue) and folded into a safe
//! default at the decision boundary.

use thiserror::Error;

/// Errors raised by zrl collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZrlError {
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Invalid host: {host}")]
    InvalidHost { host: String },

    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Job enqueue failed: {0}")]
    Enqueue(String),

    #[error("Undecodable cache entry for {key}: {reason}")]
    Decode { key: String, reason: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ZrlError>;
