// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Profile navigation tabs.

use crate::observers::Observers;
use serde::{Deserialize, Serialize};

/// One navigation tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileTab {
    pub label: String,
    pub url: String,
    pub selected: bool,
    pub title: String,
    pub id: String,
    pub accesskey: char,
}

impl ProfileTab {
    fn new(label: &str, url: String, selected: bool, title: &str, id: &str, accesskey: char) -> Self {
        Self {
            label: label.to_string(),
            url,
            selected,
            title: title.to_string(),
            id: id.to_string(),
            accesskey,
        }
    }
}

/// Request state that decides which tabs show and which is active.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TabContext {
    /// First path component of the current request (`profile`, `photos`, ...)
    pub module: String,
    /// Raw `tab` query value
    pub tab: Option<String>,
    /// Viewer owns the profile
    pub is_owner: bool,
    /// Theme shows the full events calendar in the profile
    pub events_in_profile: bool,
    /// A profile record was loaded for this page
    pub profile_loaded: bool,
    /// Owner hides their contact list
    pub hide_friends: bool,
}

/// Passed to observers, which may edit the tab list.
#[derive(Debug, Clone)]
pub struct ProfileTabsEvent {
    pub is_owner: bool,
    pub nickname: String,
    pub tab: Option<String>,
    pub tabs: Vec<ProfileTab>,
}

/// Trim and neutralise markup in a `tab` query value.
///
/// An empty value counts as absent. A whitespace-only value is present and
/// sanitises to `""`, which selects no tab.
pub fn sanitize_tab(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|raw| !raw.is_empty())?;
    Some(raw.trim().replace('<', "[").replace('>', "]"))
}

/// Tabs for `nickname`'s profile pages.
pub fn profile_tabs(base_url: &str, nickname: &str, ctx: &TabContext) -> Vec<ProfileTab> {
    let base = base_url.trim_end_matches('/');
    let tab = sanitize_tab(ctx.tab.as_deref());
    let on_module = |module: &str| tab.is_none() && ctx.module == module;
    let profile_url = format!("{base}/profile/{nickname}");

    let mut tabs = vec![
        ProfileTab::new(
            "Status",
            profile_url.clone(),
            on_module("profile"),
            "Status Messages and Posts",
            "status-tab",
            'm',
        ),
        ProfileTab::new(
            "Profile",
            format!("{profile_url}/?tab=profile"),
            tab.as_deref() == Some("profile"),
            "Profile Details",
            "profile-tab",
            'r',
        ),
        ProfileTab::new(
            "Photos",
            format!("{base}/photos/{nickname}"),
            on_module("photos"),
            "Photo Albums",
            "photo-tab",
            'h',
        ),
        ProfileTab::new(
            "Videos",
            format!("{base}/videos/{nickname}"),
            on_module("videos"),
            "Videos",
            "video-tab",
            'v',
        ),
    ];

    // Owners get the full calendar, visitors only the public one
    if ctx.is_owner && ctx.events_in_profile {
        tabs.push(ProfileTab::new(
            "Events",
            format!("{base}/events"),
            on_module("events"),
            "Events and Calendar",
            "events-tab",
            'e',
        ));
    } else if !ctx.is_owner {
        tabs.push(ProfileTab::new(
            "Events",
            format!("{base}/cal/{nickname}"),
            on_module("cal"),
            "Events and Calendar",
            "events-tab",
            'e',
        ));
    }

    if ctx.is_owner {
        tabs.push(ProfileTab::new(
            "Personal Notes",
            format!("{base}/notes"),
            on_module("notes"),
            "Only You Can See This",
            "notes-tab",
            't',
        ));
    }

    if !ctx.is_owner && (ctx.profile_loaded || !ctx.hide_friends) {
        tabs.push(ProfileTab::new(
            "Contacts",
            format!("{base}/viewcontacts/{nickname}"),
            on_module("viewcontacts"),
            "Contacts",
            "viewcontacts-tab",
            'k',
        ));
    }

    tabs
}

/// Builds tabs and lets registered observers adjust them.
pub struct ProfileTabBuilder {
    base_url: String,
    observers: Observers<ProfileTabsEvent>,
}

impl ProfileTabBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            observers: Observers::new(),
        }
    }

    pub fn observers_mut(&mut self) -> &mut Observers<ProfileTabsEvent> {
        &mut self.observers
    }

    pub fn build(&self, nickname: &str, ctx: &TabContext) -> Vec<ProfileTab> {
        let mut event = ProfileTabsEvent {
            is_owner: ctx.is_owner,
            nickname: nickname.to_string(),
            tab: sanitize_tab(ctx.tab.as_deref()),
            tabs: profile_tabs(&self.base_url, nickname, ctx),
        };
        self.observers.notify(&mut event);
        event.tabs
    }
}
