// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Birthday and event reminders for the logged-in user.
//!
//! Rows come from the caller's database query; the window helpers give the
//! bounds that query should use. Reminders are only built for a local user
//! on a desktop-class client.

use crate::cache::CacheStore;
use crate::network::NetworkKind;
use crate::visitor::VisitorContext;
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const LONG_FORMAT: &str = "%-I %p %A %B %d"; // 8 AM Friday January 18
const SHORT_FORMAT: &str = "%B %d";
const TODAY_SUFFIX: &str = " [today]";

/// A birthday event joined with its contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRow {
    pub cid: u64,
    pub name: String,
    pub url: String,
    pub network: NetworkKind,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
    /// Display in the viewer's timezone with time of day
    #[serde(default)]
    pub adjust: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdayReminder {
    pub cid: u64,
    pub link: String,
    pub title: String,
    pub date: String,
    pub today: bool,
    pub sparkle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdayReminders {
    pub count: usize,
    pub class_today: &'static str,
    pub events: Vec<BirthdayReminder>,
}

/// A non-birthday calendar event. `summary` and `description` are plain
/// text already rendered from markup by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: u64,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    /// Display in the viewer's timezone
    #[serde(default)]
    pub adjust: bool,
    /// Start day is interpreted in the viewer's timezone
    #[serde(default)]
    pub convert: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventReminder {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventReminders {
    pub count: usize,
    pub class_today: &'static str,
    pub events: Vec<EventReminder>,
}

/// Query bounds for birthdays: `start < upper` and `finish > lower`.
pub fn birthday_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now, now + ChronoDuration::days(6))
}

/// Query bounds for events: `lower <= start < upper`.
pub fn event_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now - ChronoDuration::days(1), now + ChronoDuration::days(7))
}

pub fn birthday_cache_key(uid: u64) -> String {
    format!("get_birthdays:{uid}")
}

/// Birthday rows for `uid`, served from the cache when possible.
///
/// Empty results are not cached. Cache failures fall through to the loader.
pub async fn cached_birthdays<F, Fut>(
    cache: &dyn CacheStore,
    uid: u64,
    ttl: Duration,
    loader: F,
) -> Vec<BirthdayRow>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Vec<BirthdayRow>>,
{
    let key = birthday_cache_key(uid);

    match cache.get(&key).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(rows) => {
                debug!(key = %key, "cache hit");
                return rows;
            }
            Err(e) => warn!(key = %key, error = %e, "failed to deserialize cached birthdays"),
        },
        Ok(None) => debug!(key = %key, "cache miss"),
        Err(e) => warn!(key = %key, error = %e, "birthday cache unavailable"),
    }

    let rows = loader().await;
    if rows.is_empty() {
        return rows;
    }

    match serde_json::to_value(&rows) {
        Ok(value) => {
            if let Err(e) = cache.set(&key, value, ttl).await {
                warn!(key = %key, error = %e, "failed to cache birthdays");
            }
        }
        Err(e) => warn!(key = %key, error = %e, "failed to serialize birthdays"),
    }
    rows
}

/// Birthdays this week, one per contact.
pub fn birthday_reminders(
    ctx: &VisitorContext,
    rows: &[BirthdayRow],
    now: DateTime<Utc>,
    tz: FixedOffset,
    base_url: &str,
) -> Option<BirthdayReminders> {
    ctx.desktop_local_user()?;

    let is_today = |row: &BirthdayRow| row.start < now && row.finish > now;
    let class_today = if rows.iter().any(is_today) {
        "birthday-today"
    } else {
        ""
    };

    let mut seen = Vec::new();
    let mut events = Vec::new();
    for row in rows {
        if row.name.is_empty() || seen.contains(&row.cid) {
            continue;
        }
        seen.push(row.cid);

        let today = is_today(row);
        let sparkle = row.network == NetworkKind::Dfrn;
        let link = if sparkle {
            format!("{}/redir/{}", base_url.trim_end_matches('/'), row.cid)
        } else {
            row.url.clone()
        };

        let format = if row.adjust { LONG_FORMAT } else { SHORT_FORMAT };
        let mut date = row.start.with_timezone(&tz).format(format).to_string();
        if today {
            date.push_str(TODAY_SUFFIX);
        }

        events.push(BirthdayReminder {
            cid: row.cid,
            link,
            title: row.name.clone(),
            date,
            today,
            sparkle,
        });
    }

    Some(BirthdayReminders {
        count: events.len(),
        class_today,
        events,
    })
}

/// Upcoming events, dropping any that started before today.
pub fn event_reminders(
    ctx: &VisitorContext,
    rows: &[EventRow],
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Option<EventReminders> {
    ctx.desktop_local_user()?;

    let utc = Utc.fix();
    let today_date = now.with_timezone(&tz).date_naive();
    let mut any_today = false;
    let mut events = Vec::new();

    for row in rows {
        let start_local = row.start.with_timezone(if row.convert { &tz } else { &utc });
        let start_date = start_local.date_naive();
        if start_date == today_date {
            any_today = true;
        }
        if start_date < today_date {
            continue;
        }
        let today = start_date == today_date;

        let display_tz = if row.adjust { tz } else { utc };
        let mut date = row
            .start
            .with_timezone(&display_tz)
            .format(LONG_FORMAT)
            .to_string();
        if today {
            date.push_str(TODAY_SUFFIX);
        }

        let title = if row.summary.chars().count() > 35 {
            format!("{}... ", truncate_chars(&row.summary, 32))
        } else {
            row.summary.clone()
        };

        let description = if row.description.trim().is_empty() {
            "[No description]".to_string()
        } else if row.description.chars().count() > 32 {
            format!("{}... ", truncate_chars(&row.description, 32))
        } else {
            row.description.clone()
        };

        events.push(EventReminder {
            id: row.id,
            title,
            description,
            date,
            start_time: start_local.format("%Y-%m-%d %H:%M:%S").to_string(),
            today,
        });
    }

    Some(EventReminders {
        count: events.len(),
        class_today: if any_today { "event-today" } else { "" },
        events,
    })
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
