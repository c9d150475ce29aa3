// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Profile sidebar (vcard) decisions.
//!
//! Which actions and detail labels the sidebar shows for a profile, given
//! who is looking. Facts that need the database (existing connection, the
//! visitor's friend contact, the owner's profile list) are looked up by the
//! caller and passed in on [`SidebarContext`].

use crate::link;
use crate::network::NetworkKind;
use crate::visitor::VisitorContext;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Profile or contact record shown in the sidebar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarProfile {
    /// Owning local user
    pub uid: u64,
    /// Profile record id
    pub id: u64,
    pub nickname: String,
    pub name: String,
    /// Remote profile URL, for contact records
    pub url: Option<String>,
    /// Webfinger address
    pub addr: String,
    pub network: Option<NetworkKind>,
    pub guid: String,
    /// Record describes a contact rather than a local profile
    pub is_contact: bool,
    /// Remote follow form URL offered by the visitor's own server
    pub remoteconnect: Option<String>,
    /// Owner accepts private mail from unknown senders
    pub unkmail: bool,
    /// Owner hides profile details from anonymous viewers
    pub hidewall: bool,
    pub publish: bool,
    pub net_publish: bool,
    pub address: String,
    pub location: String,
    pub locality: String,
    pub region: String,
    pub postal_code: String,
    pub country_name: String,
    pub gender: String,
    pub marital: String,
    pub homepage: String,
    pub about: String,
    pub xmpp: String,
    pub contact_photo: String,
    pub contact_thumb: String,
    pub contact_micro: String,
}

/// One of the owner's profiles in the edit menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMenuEntry {
    pub id: u64,
    pub thumb: String,
    pub profile_name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Viewer facts gathered by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarContext {
    pub visitor: VisitorContext,
    /// Local users the remote visitor is authenticated to
    pub remote_visitor_of: Vec<u64>,
    /// The local viewer already has a non-pending contact for this profile
    pub already_connected: bool,
    /// URL of the viewer's friend contact on the profile owner's side
    pub friend_contact_url: Option<String>,
    /// Owner has the multiple-profiles feature enabled
    pub multi_profiles: bool,
    /// Owner's profiles, for the edit menu
    pub owned_profiles: Vec<ProfileMenuEntry>,
    /// Rendering a blocked page
    pub block: bool,
}

impl SidebarContext {
    fn is_remote_visitor(&self) -> bool {
        !self.remote_visitor_of.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditLink {
    pub url: String,
    pub label: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditMenu {
    pub change_photo: bool,
    pub create_new: bool,
    pub entries: Vec<ProfileMenuEntry>,
}

/// Fields published for Diaspora's hcard discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiasporaVcard {
    pub guid: String,
    pub podloc: String,
    pub searchable: bool,
    pub nickname: String,
    pub fullname: String,
    pub firstname: String,
    pub lastname: String,
    pub photo300: String,
    pub photo100: String,
    pub photo50: String,
}

/// Detail labels to render. A hidden label hides its section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarSections {
    pub location: bool,
    pub gender: bool,
    pub marital: bool,
    pub homepage: bool,
    pub about: bool,
    pub xmpp: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSidebar {
    /// Network name for non-native contacts
    pub network_name: Option<&'static str>,
    pub connect: bool,
    pub remoteconnect: Option<String>,
    pub subscribe_feed: bool,
    /// Private message link, when the viewer may send one
    pub wallmessage_link: Option<String>,
    pub edit: Option<EditLink>,
    pub menu: Option<EditMenu>,
    pub sections: SidebarSections,
    pub firstname: String,
    pub lastname: String,
    pub diaspora: Option<DiasporaVcard>,
}

/// Split a display name at its first space. A name starting with a space
/// is kept whole.
pub fn split_name(name: &str) -> (String, String) {
    match name.find(' ') {
        Some(pos) if pos > 0 => {
            let first = name[..pos].trim().to_string();
            let last = name[pos..].trim().to_string();
            (first, last)
        }
        _ => (name.to_string(), String::new()),
    }
}

/// Private message path on the visitor's own server: the last `/profile/`
/// segment of their contact URL becomes `/message/new/`, followed by the
/// base64 webfinger address of the profile owner.
pub fn message_link(contact_url: &str, addr: &str) -> String {
    let path = match contact_url.rfind("/profile/") {
        Some(pos) => format!("{}/message/new/", &contact_url[..pos]),
        None => contact_url.to_string(),
    };
    format!("{path}{}", STANDARD.encode(addr))
}

/// Canonical URL to match against the viewer's contacts when deciding
/// [`SidebarContext::already_connected`].
pub fn connection_lookup_url(profile: &SidebarProfile, base_url: &str) -> String {
    match &profile.url {
        Some(url) => link::normalize(url),
        None => link::normalize(&format!(
            "{}/profile/{}",
            base_url.trim_end_matches('/'),
            profile.nickname
        )),
    }
}

fn connect_allowed(profile: &SidebarProfile, ctx: &SidebarContext) -> bool {
    let local_user = ctx.visitor.local_user_id;

    // Never to yourself
    if local_user == Some(profile.uid) {
        return false;
    }
    // Nor to an authenticated visitor of this profile
    if ctx.remote_visitor_of.contains(&profile.uid) {
        return false;
    }
    if local_user.is_some() && ctx.already_connected {
        return false;
    }
    profile.network == Some(NetworkKind::Dfrn) || profile.remoteconnect.is_some()
}

fn wallmessage_link(profile: &SidebarProfile, ctx: &SidebarContext) -> Option<String> {
    let known_visitor = ctx.visitor.identity.claimed().is_some()
        && profile.unkmail
        && ctx.visitor.local_user_id != Some(profile.uid);
    if !ctx.is_remote_visitor() && !known_visitor {
        return None;
    }

    Some(match &ctx.friend_contact_url {
        Some(url) => message_link(url, &profile.addr),
        None => format!("wallmessage/{}", profile.nickname),
    })
}

fn edit_entry(
    profile: &SidebarProfile,
    ctx: &SidebarContext,
    base: &str,
) -> (Option<EditLink>, Option<EditMenu>) {
    if profile.is_contact || ctx.visitor.local_user_id != Some(profile.uid) {
        return (None, None);
    }

    if ctx.multi_profiles {
        (
            Some(EditLink {
                url: format!("{base}/profiles"),
                label: "Profiles",
                title: "Manage/edit profiles",
            }),
            Some(EditMenu {
                change_photo: true,
                create_new: true,
                entries: ctx.owned_profiles.clone(),
            }),
        )
    } else {
        (
            Some(EditLink {
                url: format!("{base}/profiles/{}", profile.id),
                label: "Edit profile",
                title: "Edit profile",
            }),
            Some(EditMenu {
                change_photo: true,
                create_new: false,
                entries: Vec::new(),
            }),
        )
    }
}

fn sections(profile: &SidebarProfile, ctx: &SidebarContext) -> SidebarSections {
    let set = |value: &str| !value.trim().is_empty();
    let xmpp = set(&profile.xmpp);

    let anonymous = ctx.visitor.local_user_id.is_none() && !ctx.is_remote_visitor();
    if (profile.hidewall || ctx.block) && anonymous {
        return SidebarSections {
            xmpp,
            ..Default::default()
        };
    }

    SidebarSections {
        location: [
            &profile.address,
            &profile.location,
            &profile.locality,
            &profile.region,
            &profile.postal_code,
            &profile.country_name,
        ]
        .into_iter()
        .any(|value| set(value)),
        gender: set(&profile.gender),
        marital: set(&profile.marital),
        homepage: set(&profile.homepage),
        about: set(&profile.about),
        xmpp,
    }
}

/// Sidebar decisions for `profile` as seen by the viewer in `ctx`.
pub fn profile_sidebar(
    profile: &SidebarProfile,
    ctx: &SidebarContext,
    base_url: &str,
) -> ProfileSidebar {
    let base = base_url.trim_end_matches('/');

    let network_name = profile
        .network
        .filter(|network| *network != NetworkKind::Dfrn)
        .map(|network| network.display_name());

    let connect = connect_allowed(profile, ctx);
    let subscribe_feed =
        connect && profile.network == Some(NetworkKind::Dfrn) && profile.remoteconnect.is_none();

    let (edit, menu) = edit_entry(profile, ctx, base);
    let (firstname, lastname) = split_name(&profile.name);

    let diaspora = (!profile.guid.is_empty()).then(|| DiasporaVcard {
        guid: profile.guid.clone(),
        podloc: base.to_string(),
        searchable: profile.publish && profile.net_publish,
        nickname: profile.nickname.clone(),
        fullname: profile.name.clone(),
        firstname: firstname.clone(),
        lastname: lastname.clone(),
        photo300: profile.contact_photo.clone(),
        photo100: profile.contact_thumb.clone(),
        photo50: profile.contact_micro.clone(),
    });

    ProfileSidebar {
        network_name,
        connect,
        remoteconnect: profile.remoteconnect.clone(),
        subscribe_feed,
        wallmessage_link: wallmessage_link(profile, ctx),
        edit,
        menu,
        sections: sections(profile, ctx),
        firstname,
        lastname,
        diaspora,
    }
}
