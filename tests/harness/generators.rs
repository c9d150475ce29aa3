// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for flood simulation.

/// Hosts already classified as feed-only.
pub fn generate_feed_hosts(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("feed-{}.example.net", i)).collect()
}

/// Hosts with no probe snapshot.
pub fn generate_unknown_hosts(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("pod-{}.example.org", i)).collect()
}

/// Claimed profile URLs on the given hosts, cycling through paths.
pub fn generate_visitor_urls(hosts: &[String], count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://{}/profile/user{}", hosts[i % hosts.len()], i % 7))
        .collect()
}

/// Profile links on the local site.
pub fn generate_profile_targets(count: usize, domain: &str) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://{}/profile/member{}", domain, i))
        .collect()
}

/// Claimed identities that must never be probed or echoed.
/// - Empty/whitespace: missing URL
/// - not-a-url: parse failure
/// - ftp/file/javascript/data: invalid scheme (only http/https allowed)
/// - https://: empty host parse failure
/// - ://missing-scheme.com/: parse failure
pub fn generate_malformed_urls() -> Vec<&'static str> {
    vec![
        "",
        "   ",
        "not-a-url",
        "not a url",
        "ftp://wrong-scheme.com/",
        "://missing-scheme.com/",
        "https://",
        "javascript:alert(1)",
        "data:text/html,<script>",
        "file:///etc/passwd",
        "https://pod.example/profile/\tx",
        "https://pod.example/profile/x\u{7}",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_visitor_urls() {
        let hosts = generate_unknown_hosts(3);
        let urls = generate_visitor_urls(&hosts, 10);
        assert_eq!(urls.len(), 10);
        assert_eq!(urls[0], "https://pod-0.example.org/profile/user0");
        assert_eq!(urls[4], "https://pod-1.example.org/profile/user4");
    }

    #[test]
    fn test_hosts_unique() {
        let hosts = generate_feed_hosts(50);
        let unique: std::collections::HashSet<_> = hosts.iter().collect();
        assert_eq!(unique.len(), 50);
    }
}
