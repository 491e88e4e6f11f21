//! Reminder data model: records, recurrence rules, and timestamp formats.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PersistenceError, ValidationError};

/// Format users type and read: `2025-09-20 10:00`.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format written to disk. Fixed-width and year-first, so it sorts lexically in time order.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats accepted when reading a stored timestamp (older files used minutes or ISO `T`).
const STORED_FORMATS: &[&str] = &[
    STORAGE_FORMAT,
    DISPLAY_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a user-supplied due time.
pub fn parse_due(input: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = input.trim();
    NaiveDateTime::parse_from_str(trimmed, DISPLAY_FORMAT).map_err(|_| {
        ValidationError::BadTimeFormat {
            input: trimmed.to_string(),
        }
    })
}

/// Render a due time for display.
pub fn format_due(at: NaiveDateTime) -> String {
    at.format(DISPLAY_FORMAT).to_string()
}

/// Parse a timestamp read back from storage.
pub fn parse_stored(input: &str) -> Option<NaiveDateTime> {
    STORED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// Serde adapter for persisted timestamps.
pub mod timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.format(STORAGE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_stored(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

/// Identifier of a reminder, unique within its owner's collection and never reused.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReminderId(pub u64);

impl ReminderId {
    /// Records loaded from files that predate ids carry this placeholder until renumbered.
    pub const UNASSIGNED: ReminderId = ReminderId(0);
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for ReminderId {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('#').parse().map(ReminderId)
    }
}

/// How a reminder's due time advances after delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn is_recurring(self) -> bool {
        self != Self::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ValidationError::UnknownRecurrence {
                input: s.trim().to_string(),
            }),
        }
    }
}

// Stored as `null` for no recurrence, matching files written by earlier versions.
impl Serialize for Recurrence {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => s.serialize_none(),
            other => s.serialize_str(other.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(Self::None),
            Some(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A single time-stamped note owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(default)]
    pub id: ReminderId,
    /// Filled from the owning record on load; not written per reminder.
    #[serde(skip)]
    pub owner_id: String,
    #[serde(with = "timestamp", alias = "time")]
    pub due_at: NaiveDateTime,
    pub text: String,
    #[serde(default, alias = "repeat")]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub sent: bool,
}

impl Reminder {
    /// An active reminder is still waiting to be delivered.
    pub fn is_active(&self) -> bool {
        !self.sent
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        !self.sent && self.due_at <= now
    }
}

/// Value produced by a store mutation, with any save failure attached as a warning.
///
/// The in-memory change has been applied either way; a warning means it may not
/// survive a restart.
#[derive(Debug)]
#[must_use]
pub struct Persisted<T> {
    pub value: T,
    pub warning: Option<PersistenceError>,
}

impl<T> Persisted<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn is_clean(&self) -> bool {
        self.warning.is_none()
    }
}

/// Result of a batch `/done`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoneReport {
    /// Texts of the reminders completed by this call, in position order.
    pub completed: Vec<String>,
    /// Tokens that did not resolve to an active reminder.
    pub invalid: Vec<crate::error::PositionError>,
}

/// Active and completed views for one owner, each sorted by due time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderLists {
    pub active: Vec<Reminder>,
    pub completed: Vec<Reminder>,
}

impl ReminderLists {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}
