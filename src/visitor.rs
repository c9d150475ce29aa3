// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Visitor identity supplied by the session layer.
//!
//! A claimed URL comes from federated authentication and is untrusted until
//! it passes [`validate_url`].

use crate::error::{Result, ZrlError};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Profile URL a remote visitor claims as their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorIdentity {
    #[serde(default)]
    pub claimed_url: Option<String>,
}

impl VisitorIdentity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            claimed_url: Some(url.into()),
        }
    }

    /// The claimed URL trimmed, if present and non-blank.
    pub fn claimed(&self) -> Option<&str> {
        self.claimed_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Request-scoped context passed explicitly into every decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitorContext {
    #[serde(default)]
    pub identity: VisitorIdentity,

    /// Logged-in local user, if any
    #[serde(default)]
    pub local_user_id: Option<u64>,

    /// Client is a phone or tablet
    #[serde(default)]
    pub is_mobile: bool,
}

impl VisitorContext {
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            identity: VisitorIdentity::remote(url),
            ..Default::default()
        }
    }

    pub fn local(uid: u64) -> Self {
        Self {
            local_user_id: Some(uid),
            ..Default::default()
        }
    }

    /// Local user on a desktop-class client.
    pub fn desktop_local_user(&self) -> Option<u64> {
        self.local_user_id.filter(|_| !self.is_mobile)
    }

    /// User whose theme renders the page.
    ///
    /// `page_uid` is the owner of the page being viewed (0 or absent when
    /// there is none). A logged-in viewer sees their own theme when the page
    /// has no owner or when they always prefer it.
    pub fn theme_uid(&self, page_uid: Option<u64>, always_my_theme: bool) -> u64 {
        let page_uid = page_uid.unwrap_or(0);
        match self.local_user_id {
            Some(local) if always_my_theme || page_uid == 0 => local,
            _ => page_uid,
        }
    }
}

/// Parse an untrusted URL, accepting only absolute http(s) URLs with a host.
///
/// Surrounding whitespace is ignored. Control characters anywhere else are
/// rejected, since the URL parser would silently drop them and the raw claim
/// would then differ from the URL that was checked.
pub fn validate_url(raw: &str) -> Result<Url> {
    let invalid = || ZrlError::InvalidUrl {
        url: raw.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.chars().any(char::is_control) {
        debug!(url = ?raw, "URL contains control characters");
        return Err(invalid());
    }

    let url = Url::parse(trimmed).map_err(|_| {
        debug!(url = %raw, "Unparseable URL");
        invalid()
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        debug!(url = %raw, "Invalid URL (bad scheme or no host)");
        return Err(invalid());
    }

    Ok(url)
}
