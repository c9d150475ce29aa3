// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Advanced profile detail fields.
//!
//! Selects and labels the populated fields of a profile record in display
//! order. Free-text fields pass through a [`TextRenderer`] supplied by the
//! caller (markup conversion lives outside this crate).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Converts stored profile markup to display text.
pub trait TextRenderer {
    fn render(&self, text: &str) -> String;

    /// Turn bare URLs into links. Identity by default.
    fn linkify(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Renderer that passes text through untouched.
pub struct PlainText;

impl TextRenderer for PlainText {
    fn render(&self, text: &str) -> String {
        text.trim().to_string()
    }
}

/// Stored profile record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    pub id: u64,
    pub uid: u64,
    pub name: String,
    pub gender: String,
    /// `YYYY-MM-DD`; year `0000` when hidden, `0000-00-00` when unset
    pub dob: String,
    pub marital: String,
    pub with: String,
    pub sexual: String,
    pub homepage: String,
    pub hometown: String,
    pub pub_keywords: String,
    pub politic: String,
    pub religion: String,
    pub about: String,
    pub interest: String,
    pub likes: String,
    pub dislikes: String,
    pub contact: String,
    pub music: String,
    pub book: String,
    pub tv: String,
    pub film: String,
    pub romance: String,
    pub work: String,
    pub education: String,
}

/// One labelled row of the details panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with: Option<String>,
}

impl ProfileField {
    fn new(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: value.into(),
            with: None,
        }
    }
}

/// Birth date with an optional year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthday {
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
}

impl Birthday {
    /// Parse `YYYY-MM-DD`. `None` for unset or impossible dates.
    pub fn parse(dob: &str) -> Option<Self> {
        let mut parts = dob.trim().splitn(3, '-');
        let year: i32 = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let day: u32 = parts
            .next()?
            .split(|c: char| !c.is_ascii_digit())
            .next()?
            .parse()
            .ok()?;

        // Leap year stands in when the year is hidden
        NaiveDate::from_ymd_opt(if year > 0 { year } else { 2000 }, month, day)?;

        Some(Self {
            year: (year > 0).then_some(year),
            month,
            day,
        })
    }

    pub fn display(&self) -> String {
        match self.year.and_then(|y| NaiveDate::from_ymd_opt(y, self.month, self.day)) {
            Some(date) => date.format("%-d %B, %Y").to_string(),
            None => NaiveDate::from_ymd_opt(2000, self.month, self.day)
                .map(|date| date.format("%-d %B").to_string())
                .unwrap_or_default(),
        }
    }

    /// Completed years on `today`, when the birth year is known.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let year = self.year?;
        let mut age = today.year() - year;
        if (today.month(), today.day()) < (self.month, self.day) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}

/// Populated fields of `profile` in display order, or `None` for a
/// profile without a name.
pub fn advanced_profile(
    profile: &ProfileRecord,
    viewer_uid: Option<u64>,
    base_url: &str,
    today: NaiveDate,
    renderer: &dyn TextRenderer,
) -> Option<Vec<ProfileField>> {
    if profile.name.trim().is_empty() {
        return None;
    }

    let mut fields = vec![ProfileField::new("fullname", "Full Name:", profile.name.as_str())];
    push_nonempty(&mut fields, "gender", "Gender:", &profile.gender);

    if let Some(birthday) = Birthday::parse(&profile.dob) {
        fields.push(ProfileField::new("birthday", "Birthday:", birthday.display()));
        if let Some(age) = birthday.age_on(today).filter(|age| *age > 0) {
            fields.push(ProfileField::new("age", "Age:", age.to_string()));
        }
    }

    if !profile.marital.trim().is_empty() {
        let mut marital = ProfileField::new("marital", "Status:", profile.marital.as_str());
        marital.with = Some(profile.with.clone()).filter(|w| !w.trim().is_empty());
        fields.push(marital);
    }

    push_nonempty(&mut fields, "sexual", "Sexual Preference:", &profile.sexual);
    for (key, label, url) in [
        ("homepage", "Homepage:", &profile.homepage),
        ("hometown", "Hometown:", &profile.hometown),
    ] {
        if !url.trim().is_empty() {
            push_nonempty(&mut fields, key, label, renderer.linkify(url));
        }
    }
    push_nonempty(&mut fields, "pub_keywords", "Tags:", &profile.pub_keywords);
    push_nonempty(&mut fields, "politic", "Political Views:", &profile.politic);
    push_nonempty(&mut fields, "religion", "Religion:", &profile.religion);

    let rendered = [
        ("about", "About:", &profile.about),
        ("interest", "Hobbies/Interests:", &profile.interest),
        ("likes", "Likes:", &profile.likes),
        ("dislikes", "Dislikes:", &profile.dislikes),
        ("contact", "Contact information and Social Networks:", &profile.contact),
        ("music", "Musical interests:", &profile.music),
        ("book", "Books, literature:", &profile.book),
        ("tv", "Television:", &profile.tv),
        ("film", "Film/dance/culture/entertainment:", &profile.film),
        ("romance", "Love/Romance:", &profile.romance),
        ("work", "Work/employment:", &profile.work),
        ("education", "School/education:", &profile.education),
    ];
    for (key, label, text) in rendered {
        if !text.trim().is_empty() {
            push_nonempty(&mut fields, key, label, renderer.render(text));
        }
    }

    if viewer_uid == Some(profile.uid) {
        fields.push(ProfileField::new(
            "edit",
            "Edit profile",
            format!("{}/profiles/{}", base_url.trim_end_matches('/'), profile.id),
        ));
    }

    Some(fields)
}

fn push_nonempty(
    fields: &mut Vec<ProfileField>,
    key: &'static str,
    label: &'static str,
    value: impl Into<String>,
) {
    let value = value.into();
    if !value.trim().is_empty() {
        fields.push(ProfileField::new(key, label, value));
    }
}
