// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Profile link comparison.
//!
//! Federated peers publish the same profile under `http` and `https`, with
//! and without a trailing slash, in arbitrary case. Two links are equivalent
//! when their canonical forms match.

use url::Url;

/// Canonical form of a link. Never fails: input that is not an absolute URL
/// with a host normalizes to itself trimmed and lowercased.
pub fn normalize(url: &str) -> String {
    let url = url.trim();
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_lowercase(),
    };

    let Some(host) = parsed.host_str() else {
        return url.to_lowercase();
    };

    let scheme = match parsed.scheme() {
        "https" => "http",
        other => other,
    };

    // The url crate already drops the default port of the parsed scheme;
    // folding https into http can expose an explicit :80.
    let port = parsed
        .port()
        .filter(|port| !(scheme == "http" && *port == 80))
        .map(|port| format!(":{port}"))
        .unwrap_or_default();

    let path = parsed.path().trim_end_matches('/');
    let query = parsed.query().map(|q| format!("?{q}")).unwrap_or_default();

    format!("{scheme}://{host}{port}{path}{query}").to_lowercase()
}

/// Whether two links point at the same profile.
pub fn equivalent(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
