use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage format for `remind_at`. Lexical order equals time order.
pub const REMIND_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A scheduled farmer task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub remind_at: NaiveDateTime,
}

impl Reminder {
    /// Dashboard line, e.g. `Sep 22, 2025 07:30 AM`
    pub fn display_time(&self) -> String {
        self.remind_at.format("%b %d, %Y %I:%M %p").to_string()
    }

    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.remind_at >= now
    }
}

/// Values for a reminder that hasn't been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub title: String,
    pub description: Option<String>,
    pub remind_at: NaiveDateTime,
}

impl NewReminder {
    pub fn new(title: impl Into<String>, description: Option<&str>, remind_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            remind_at,
        }
    }

    /// The dashboard's "Add sample reminder" quick action
    pub fn sample(now: NaiveDateTime) -> Self {
        Self::new(
            "Irrigate Wheat Field",
            Some("Irrigate the main wheat field"),
            now + Duration::days(1),
        )
    }
}

pub(crate) fn format_remind_at(at: &NaiveDateTime) -> String {
    at.format(REMIND_AT_FORMAT).to_string()
}

pub(crate) fn parse_remind_at(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, REMIND_AT_FORMAT)
}
