//! Calendar event records in the calendar provider's JSON shape.
//!
//! Serialization follows the provider's event resource: camelCase keys,
//! `start`/`end` as `{dateTime, timeZone}`, recurrence as a list of
//! `RRULE:` lines, reminders as popup overrides.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::RecurrenceRule;
use crate::resolver::ResolvedInstant;
use crate::types::MeetingKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: DateTime<FixedOffset>,
    pub time_zone: String,
}

impl From<ResolvedInstant> for EventDateTime {
    fn from(instant: ResolvedInstant) -> Self {
        EventDateTime {
            date_time: instant.fixed(),
            time_zone: instant.zone_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Reminders {
    /// Popup reminders at each of `minutes` before the event.
    pub fn popups(minutes: &[u32]) -> Self {
        Reminders {
            use_default: false,
            overrides: minutes
                .iter()
                .map(|&minutes| ReminderOverride {
                    method: "popup".to_string(),
                    minutes,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Stable, human-legible identity: `"<course> Lecture"`, `"<course> Final Exam"`, ...
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "recurrence_lines"
    )]
    pub recurrence: Option<RecurrenceRule>,
    pub reminders: Reminders,
}

impl CalendarEvent {
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.date_time.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.date_time.with_timezone(&Utc)
    }

    /// Kind named by the summary's label, so events read back from JSON keep it.
    pub fn kind(&self) -> Option<MeetingKind> {
        MeetingKind::from_summary(&self.summary)
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// The provider's `recurrence` list for this event (empty for one-off events).
    pub fn recurrence_lines(&self) -> Vec<String> {
        self.recurrence.iter().map(ToString::to_string).collect()
    }
}

mod recurrence_lines {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::recurrence::RecurrenceRule;

    pub fn serialize<S: Serializer>(
        rule: &Option<RecurrenceRule>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match rule {
            Some(rule) => [rule.to_string()].serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Takes the first `RRULE:` line; EXDATE/RDATE lines are not produced by
    /// this crate and are ignored.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<RecurrenceRule>, D::Error> {
        let lines: Option<Vec<String>> = Option::deserialize(deserializer)?;
        lines
            .unwrap_or_default()
            .iter()
            .find(|line| line.starts_with("RRULE:"))
            .map(|line| line.parse().map_err(D::Error::custom))
            .transpose()
    }
}
