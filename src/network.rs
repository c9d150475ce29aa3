// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Remote network classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Federation protocol spoken by a remote profile.
///
/// Serialised with the short wire codes used by probe results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkKind {
    #[serde(rename = "dfrn")]
    Dfrn,
    #[serde(rename = "dspr")]
    Diaspora,
    #[serde(rename = "stat")]
    OStatus,
    #[serde(rename = "feed")]
    Feed,
    #[serde(rename = "phnt")]
    Phantom,
    #[serde(rename = "mail")]
    Mail,
    #[serde(rename = "zot!")]
    Zot,
    #[serde(other, rename = "")]
    Other,
}

impl NetworkKind {
    /// Wire code for this network.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Dfrn => "dfrn",
            Self::Diaspora => "dspr",
            Self::OStatus => "stat",
            Self::Feed => "feed",
            Self::Phantom => "phnt",
            Self::Mail => "mail",
            Self::Zot => "zot!",
            Self::Other => "",
        }
    }

    /// Parse a comma-separated list of wire codes, skipping unknown ones.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .filter_map(|code| code.parse::<Self>().ok())
            .filter(|network| *network != Self::Other)
            .collect()
    }

    /// Human-readable protocol name shown next to a remote profile.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dfrn => "Friendica",
            Self::Diaspora => "Diaspora",
            Self::OStatus => "OStatus",
            Self::Feed => "RSS/Atom",
            Self::Phantom => "Unknown",
            Self::Mail => "Email",
            Self::Zot => "Zot!",
            Self::Other => "",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other => write!(f, "unknown"),
            other => write!(f, "{}", other.code()),
        }
    }
}

impl FromStr for NetworkKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "dfrn" => Self::Dfrn,
            "dspr" => Self::Diaspora,
            "stat" => Self::OStatus,
            "feed" => Self::Feed,
            "phnt" => Self::Phantom,
            "mail" => Self::Mail,
            "zot!" => Self::Zot,
            _ => Self::Other,
        })
    }
}
