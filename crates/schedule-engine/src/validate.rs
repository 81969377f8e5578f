//! Structural checks and the "still relevant" predicate.
//!
//! Both work on the provider JSON shape as well as on typed events, so events
//! fetched back from a calendar can be checked with the same rules.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use crate::error::{Result, ScheduleError};
use crate::event::CalendarEvent;

/// Fail unless `event` has `summary`, `location`, `start.dateTime` and
/// `end.dateTime`, with both datetimes parseable as ISO 8601.
pub fn validate_structure(event: &Value) -> Result<()> {
    let object = event
        .as_object()
        .ok_or_else(|| ScheduleError::MalformedEvent("event is not a JSON object".to_string()))?;

    for field in ["summary", "location", "start", "end"] {
        if !object.contains_key(field) {
            return Err(ScheduleError::MalformedEvent(format!(
                "missing required field: {}",
                field
            )));
        }
    }

    for field in ["start", "end"] {
        let date_time = event[field]["dateTime"].as_str().ok_or_else(|| {
            ScheduleError::MalformedEvent(format!("missing {}.dateTime", field))
        })?;
        if parse_event_datetime(date_time, None).is_none() {
            return Err(ScheduleError::MalformedEvent(format!(
                "{}.dateTime '{}' is not an ISO 8601 datetime",
                field, date_time
            )));
        }
    }

    Ok(())
}

/// [`validate_structure`] applied to an assembled event's serialized form.
pub fn validate_event(event: &CalendarEvent) -> Result<()> {
    let value =
        serde_json::to_value(event).map_err(|e| ScheduleError::MalformedEvent(e.to_string()))?;
    validate_structure(&value)
}

/// Whether `event` can still occur at or after `now`.
///
/// Recurring events are compared against their UNTIL bound, one-off events
/// against their end.
pub fn is_ongoing(event: &CalendarEvent, now: DateTime<Utc>) -> bool {
    match &event.recurrence {
        Some(rule) => now <= rule.until,
        None => now <= event.end_utc(),
    }
}

/// [`is_ongoing`] for provider JSON. Fails open: an event whose bound is
/// missing or unreadable counts as ongoing.
pub fn is_ongoing_json(event: &Value, now: DateTime<Utc>) -> bool {
    if let Some(lines) = event["recurrence"].as_array() {
        let rrule = lines
            .iter()
            .filter_map(Value::as_str)
            .find(|line| line.starts_with("RRULE:"));
        if let Some(rrule) = rrule {
            // A rule without UNTIL runs forever (or until COUNT, which we don't evaluate).
            return until_of(rrule).is_none_or(|until| now <= until);
        }
    }

    let end = &event["end"];
    match end["dateTime"].as_str() {
        Some(date_time) => parse_event_datetime(date_time, end["timeZone"].as_str())
            .is_none_or(|end| now <= end),
        None => true,
    }
}

/// Parse an event datetime. Offset-bearing strings are taken as-is; naive ones
/// are read in `time_zone` when it names a zone, else as UTC.
pub fn parse_event_datetime(date_time: &str, time_zone: Option<&str>) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_time) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(date_time, "%Y-%m-%dT%H:%M:%S").ok()?;
    match time_zone.and_then(|name| name.parse::<Tz>().ok()) {
        Some(tz) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Some(naive.and_utc()),
    }
}

fn until_of(rrule: &str) -> Option<DateTime<Utc>> {
    let value = rrule
        .trim_start_matches("RRULE:")
        .split(';')
        .find_map(|part| part.strip_prefix("UNTIL="))?;
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Some(dt.and_utc());
    }
    chrono::NaiveDate::parse_from_str(value, "%Y%m%d")
        .ok()?
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc())
}
