// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Profile page display decisions.

pub mod advanced;
pub mod reminders;
pub mod sidebar;
pub mod tabs;

pub use advanced::{advanced_profile, ProfileField, ProfileRecord, TextRenderer};
pub use reminders::{birthday_reminders, event_reminders, BirthdayReminders, EventReminders};
pub use sidebar::{profile_sidebar, ProfileSidebar, SidebarContext, SidebarProfile};
pub use tabs::{profile_tabs, ProfileTab, ProfileTabBuilder, TabContext};
