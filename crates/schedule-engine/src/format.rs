//! Human-readable renderings for previews.
//!
//! These sit on top of the canonical ISO 8601 and RRULE outputs and never feed
//! back into them.

use chrono::{DateTime, NaiveDateTime};

use crate::types::weekday_from_byday;

/// Describe a provider `recurrence` list, e.g. `Weekly on Mon, Wed, Fri until Dec 12, 2025`.
///
/// Uses the first `RRULE:` line. Without one, the lines are joined as-is; an
/// RRULE with an unfamiliar frequency is returned without its prefix.
pub fn describe_recurrence<S: AsRef<str>>(lines: &[S]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let Some(rrule) = lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| line.starts_with("RRULE:"))
    else {
        return lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
    };

    let body = &rrule["RRULE:".len()..];
    let mut freq = String::new();
    let mut interval = "1";
    let mut byday = None;
    let mut until = None;
    for (key, value) in body.split(';').filter_map(|chunk| chunk.split_once('=')) {
        match key.to_ascii_uppercase().as_str() {
            "FREQ" => freq = value.to_ascii_lowercase(),
            "INTERVAL" => interval = value,
            "BYDAY" => byday = Some(value),
            "UNTIL" => until = Some(value),
            _ => {}
        }
    }

    let every = |unit: &str, plural: &str| {
        if interval == "1" {
            unit.to_string()
        } else {
            format!("Every {} {}", interval, plural)
        }
    };

    let mut pieces = match freq.as_str() {
        "weekly" => {
            let mut pieces = vec![every("Weekly", "weeks")];
            if let Some(byday) = byday {
                let days: Vec<String> = byday
                    .split(',')
                    .map(|code| {
                        weekday_from_byday(code).map_or_else(|| code.to_string(), |d| d.to_string())
                    })
                    .collect();
                pieces.push(format!("on {}", days.join(", ")));
            }
            pieces
        }
        "daily" => vec![every("Daily", "days")],
        "monthly" => vec![every("Monthly", "months")],
        "yearly" => vec![every("Yearly", "years")],
        _ => return body.to_string(),
    };

    if let Some(until) = until {
        match NaiveDateTime::parse_from_str(until, "%Y%m%dT%H%M%SZ") {
            Ok(dt) => pieces.push(format!("until {}", dt.format("%b %-d, %Y"))),
            Err(_) => pieces.push(format!("until {}", until)),
        }
    }

    pieces.join(" ")
}

/// `2025-03-21T14:10:00-07:00` → `March 21, 2025 at 2:10 PM`, in the
/// datetime's own offset. Unparseable input is returned unchanged.
pub fn describe_datetime(iso: &str) -> String {
    let format = "%B %-d, %Y at %-I:%M %p";
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return dt.format(format).to_string();
    }
    match NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S") {
        Ok(dt) => dt.format(format).to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_rule_with_until() {
        let lines = ["RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20251212T235959Z"];
        assert_eq!(
            describe_recurrence(&lines),
            "Weekly on Mon, Wed, Fri until Dec 12, 2025"
        );
    }

    #[test]
    fn interval_and_raw_fallbacks() {
        assert_eq!(
            describe_recurrence(&["RRULE:FREQ=DAILY;INTERVAL=3"]),
            "Every 3 days"
        );
        assert_eq!(
            describe_recurrence(&["RRULE:FREQ=HOURLY;COUNT=2"]),
            "FREQ=HOURLY;COUNT=2"
        );
        assert_eq!(
            describe_recurrence(&["EXDATE:20251201", "RDATE:20251202"]),
            "EXDATE:20251201, RDATE:20251202"
        );
        assert_eq!(describe_recurrence::<&str>(&[]), "");
    }

    #[test]
    fn datetime_is_twelve_hour() {
        assert_eq!(
            describe_datetime("2025-03-21T14:10:00-07:00"),
            "March 21, 2025 at 2:10 PM"
        );
        assert_eq!(describe_datetime("not a date"), "not a date");
    }
}
