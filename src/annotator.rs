// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Zero-redirect link annotation.
//!
//! Outgoing profile links carry the remote visitor's own profile URL in a
//! `zrl` query parameter so the receiving site can recognise the visitor
//! without a redirect handshake.

use crate::config::ZrlConfig;
use crate::link;
use crate::visitor::{validate_url, VisitorIdentity};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

/// Link to decorate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRewriteRequest {
    pub target_url: String,
    #[serde(default)]
    pub force_trailing_slash: bool,
}

/// Annotator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub url: String,
    /// Whether a visitor parameter was appended
    pub annotated: bool,
}

/// Appends the visitor's identity to profile-shaped links.
pub struct ZrlAnnotator {
    config: ZrlConfig,
}

impl ZrlAnnotator {
    pub fn new(config: ZrlConfig) -> Self {
        Self { config }
    }

    /// Decorate `target_url` for `visitor_url`.
    ///
    /// At most one parameter is appended per call; an existing one is left
    /// in place.
    pub fn annotate(
        &self,
        target_url: &str,
        force_trailing_slash: bool,
        visitor_url: Option<&str>,
    ) -> String {
        self.annotate_detailed(target_url, force_trailing_slash, visitor_url)
            .url
    }

    pub fn rewrite(&self, request: &LinkRewriteRequest, visitor: &VisitorIdentity) -> Annotation {
        self.annotate_detailed(
            &request.target_url,
            request.force_trailing_slash,
            visitor.claimed(),
        )
    }

    pub fn annotate_detailed(
        &self,
        target_url: &str,
        force_trailing_slash: bool,
        visitor_url: Option<&str>,
    ) -> Annotation {
        let unchanged = |url: String| Annotation {
            url,
            annotated: false,
        };

        if target_url.is_empty() {
            return unchanged(String::new());
        }

        if !force_trailing_slash && !target_url.contains(&self.config.profile_marker) {
            return unchanged(target_url.to_string());
        }

        let mut target = target_url.to_string();
        if force_trailing_slash && !target.ends_with('/') {
            target.push('/');
        }

        let Some(visitor) = visitor_url.map(str::trim).filter(|v| !v.is_empty()) else {
            return unchanged(target);
        };

        // Untrusted input is never echoed into a constructed URL.
        if validate_url(visitor).is_err() {
            debug!(visitor = %visitor, "Skipping annotation for invalid visitor URL");
            return unchanged(target);
        }

        if link::equivalent(visitor, &target) {
            debug!(target = %target, "Skipping self-link annotation");
            return unchanged(target);
        }

        let separator = if target.contains('?') { '&' } else { '?' };
        let encoded: String = form_urlencoded::byte_serialize(visitor.as_bytes()).collect();
        target.push(separator);
        target.push_str(&self.config.param);
        target.push('=');
        target.push_str(&encoded);

        Annotation {
            url: target,
            annotated: true,
        }
    }
}

impl Default for ZrlAnnotator {
    fn default() -> Self {
        Self::new(ZrlConfig::default())
    }
}
