//! Weekly recurrence synthesis, RRULE text, and occurrence expansion.
//!
//! A course meets weekly until the last class before finals week. The rule's
//! UNTIL is found by walking back from the Sunday before the final exam to the
//! last weekday the course meets on.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rrule::RRuleSet;

use crate::error::{Result, ScheduleError};
use crate::resolver::ResolvedInstant;
use crate::types::{weekday_from_byday, WeekdaySet};

/// Upper bound on the backward walk. Seven steps always suffice for a
/// non-empty weekday set.
pub const MAX_BACKWARD_STEPS: u32 = 31;

/// Cap on expanded occurrences. A semester is well under this.
const MAX_OCCURRENCES: u16 = 500;

/// A weekly rule: `FREQ=WEEKLY;BYDAY=<weekdays>;UNTIL=<until>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub weekdays: WeekdaySet,
    /// Inclusive bound on the last occurrence, in UTC.
    pub until: DateTime<Utc>,
}

impl RecurrenceRule {
    pub fn until_date(&self) -> NaiveDate {
        self.until.date_naive()
    }

    /// RRULE value without the `RRULE:` prefix.
    pub fn rule_body(&self) -> String {
        format!(
            "FREQ=WEEKLY;BYDAY={};UNTIL={}",
            self.weekdays.byday(),
            self.until.format("%Y%m%dT%H%M%SZ")
        )
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RRULE:{}", self.rule_body())
    }
}

impl FromStr for RecurrenceRule {
    type Err = ScheduleError;

    /// Parse `[RRULE:]FREQ=WEEKLY;BYDAY=..;UNTIL=..`. BYDAY may be in any
    /// order; UNTIL may be a bare date (taken as 23:59:59 UTC) or a UTC datetime.
    fn from_str(s: &str) -> Result<Self> {
        let body = s.trim();
        let body = body.strip_prefix("RRULE:").unwrap_or(body);

        let mut freq = None;
        let mut weekdays = None;
        let mut until = None;
        for part in body.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ScheduleError::InvalidRule(format!("'{}' is not KEY=VALUE", part)))?;
            match key.to_ascii_uppercase().as_str() {
                "FREQ" => freq = Some(value.to_ascii_uppercase()),
                "BYDAY" => {
                    let days = value
                        .split(',')
                        .map(|code| {
                            weekday_from_byday(code).ok_or_else(|| {
                                ScheduleError::InvalidRule(format!("unknown BYDAY code '{}'", code))
                            })
                        })
                        .collect::<Result<WeekdaySet>>()?;
                    weekdays = Some(days);
                }
                "UNTIL" => until = Some(parse_until(value)?),
                // INTERVAL, WKST and friends don't occur in generated rules.
                _ => {}
            }
        }

        if freq.as_deref() != Some("WEEKLY") {
            return Err(ScheduleError::InvalidRule(format!(
                "expected FREQ=WEEKLY in '{}'",
                s
            )));
        }
        let weekdays = weekdays
            .filter(|w| !w.is_empty())
            .ok_or_else(|| ScheduleError::InvalidRule(format!("missing BYDAY in '{}'", s)))?;
        let until =
            until.ok_or_else(|| ScheduleError::InvalidRule(format!("missing UNTIL in '{}'", s)))?;

        Ok(RecurrenceRule { weekdays, until })
    }
}

fn parse_until(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map(end_of_day_utc)
        .map_err(|e| ScheduleError::InvalidRule(format!("bad UNTIL '{}': {}", value, e)))
}

fn end_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
        .and_utc()
}

/// Build the weekly rule for a course whose final exam falls on `anchor`.
///
/// UNTIL is the last weekday of `weekdays` (in Mon→Sun order) on or before the
/// Sunday preceding the exam's week, at 23:59:59 UTC.
///
/// # Errors
/// `ScheduleError::RecurrenceSearchExhausted` if no such day is found within
/// [`MAX_BACKWARD_STEPS`] days, which only happens for an empty weekday set.
pub fn synthesize(weekdays: WeekdaySet, anchor: NaiveDate) -> Result<RecurrenceRule> {
    let exhausted = || ScheduleError::RecurrenceSearchExhausted {
        anchor: anchor.to_string(),
        weekday: weekdays
            .last()
            .map_or_else(|| "weekday".to_string(), |d| d.to_string()),
    };
    let target = weekdays.last().ok_or_else(exhausted)?;

    let sunday_before =
        anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64 + 1);

    let mut day = sunday_before;
    let mut steps = 0;
    while day.weekday() != target {
        day -= Duration::days(1);
        steps += 1;
        if steps > MAX_BACKWARD_STEPS {
            return Err(exhausted());
        }
    }

    Ok(RecurrenceRule {
        weekdays,
        until: end_of_day_utc(day),
    })
}

/// One concrete meeting of a recurring event.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Expand a rule into the concrete meetings it produces, starting at `first_start`.
///
/// Occurrences keep their local wall-clock time across DST changes. The UTC
/// UNTIL bound is applied here rather than handed to the RRULE parser, which
/// wants UNTIL in DTSTART's zone.
///
/// # Errors
/// `ScheduleError::InvalidRule` if the rule text is rejected by the RRULE parser.
pub fn expand_occurrences(
    rule: &RecurrenceRule,
    first_start: ResolvedInstant,
    duration: Duration,
) -> Result<Vec<Occurrence>> {
    let start = first_start.datetime();

    let rrule_text = format!(
        "DTSTART;TZID={}:{}\nRRULE:FREQ=WEEKLY;BYDAY={}",
        start.timezone().name(),
        start.naive_local().format("%Y%m%dT%H%M%S"),
        rule.weekdays.byday(),
    );

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| ScheduleError::InvalidRule(format!("{}", e)))?;

    let occurrences = rrule_set
        .all(MAX_OCCURRENCES)
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc))
        .take_while(|start_utc| *start_utc <= rule.until)
        .map(|start_utc| Occurrence {
            start: start_utc,
            end: start_utc + duration,
        })
        .collect();

    Ok(occurrences)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn until_parses_bare_date_as_end_of_day() {
        let rule: RecurrenceRule = "FREQ=WEEKLY;BYDAY=MO;UNTIL=20251212".parse().unwrap();
        assert_eq!(rule.to_string(), "RRULE:FREQ=WEEKLY;BYDAY=MO;UNTIL=20251212T235959Z");
    }

    #[test]
    fn non_weekly_rule_is_rejected() {
        assert!("RRULE:FREQ=DAILY;UNTIL=20251212T235959Z"
            .parse::<RecurrenceRule>()
            .is_err());
    }

    #[test]
    fn empty_set_exhausts_search() {
        let anchor = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let err = synthesize(WeekdaySet::EMPTY, anchor).unwrap_err();
        assert!(matches!(err, ScheduleError::RecurrenceSearchExhausted { .. }));
    }
}
