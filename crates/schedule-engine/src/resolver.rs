//! Date/time resolution: clock readings and partial dates → zone-localized instants.
//!
//! Lectures and discussions list only weekdays, so their first date is the
//! soonest matching day on or after "today" in the configured zone. Final
//! exams list an explicit month and day.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, Month, NaiveDate, NaiveDateTime,
    NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::{Result, ScheduleError};
use crate::types::{ClockTime, Meridiem, WeekdaySet};

/// Spring-forward gaps are at most an hour in practice; search a little further.
const GAP_STEP_MINUTES: i64 = 30;
const GAP_MAX_STEPS: i64 = 6;

/// A point in time expressed in the configured named zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedInstant(DateTime<Tz>);

impl ResolvedInstant {
    pub fn new(dt: DateTime<Tz>) -> Self {
        ResolvedInstant(dt)
    }

    pub fn datetime(&self) -> DateTime<Tz> {
        self.0
    }

    pub fn naive_local(&self) -> NaiveDateTime {
        self.0.naive_local()
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// The instant with its UTC offset fixed, as serialized in events.
    pub fn fixed(&self) -> DateTime<FixedOffset> {
        self.0.with_timezone(&self.0.offset().fix())
    }

    /// ISO 8601 with explicit offset, e.g. `2025-12-15T08:00:00-08:00`.
    pub fn to_iso(&self) -> String {
        self.fixed().to_rfc3339()
    }

    /// IANA name of the zone, e.g. `America/Los_Angeles`.
    pub fn zone_name(&self) -> &'static str {
        self.0.timezone().name()
    }
}

/// Resolves schedule times against a fixed "today" in one zone.
#[derive(Debug, Clone)]
pub struct DateTimeResolver {
    tz: Tz,
    policy: DstPolicy,
    today: NaiveDate,
    reference_year: i32,
}

impl DateTimeResolver {
    /// `reference_year` defaults to the year of `now` in `tz`.
    pub fn new(tz: Tz, policy: DstPolicy, now: DateTime<Utc>, reference_year: Option<i32>) -> Self {
        let today = now.with_timezone(&tz).date_naive();
        DateTimeResolver {
            tz,
            policy,
            today,
            reference_year: reference_year.unwrap_or_else(|| today.year()),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The earliest date on or after today that falls on one of `weekdays`.
    /// An empty set yields today.
    pub fn soonest_date(&self, weekdays: WeekdaySet) -> NaiveDate {
        let today = self.today.weekday().num_days_from_monday() as i64;
        let offset = weekdays
            .iter()
            .map(|day| (day.num_days_from_monday() as i64 - today).rem_euclid(7))
            .min()
            .unwrap_or(0);
        self.today + Duration::days(offset)
    }

    /// Resolve a clock reading into an instant.
    ///
    /// - `meridiem` is required; a time with no AM/PM cannot be placed on a 24-hour clock.
    /// - With `day_of_month`, the date is `reference_year`-`month`-`day_of_month`,
    ///   `month` defaulting to today's month.
    /// - Without it, the date is the soonest day among `weekdays`, or today.
    ///
    /// # Errors
    /// `ScheduleError::MalformedFragment` for a missing meridiem or impossible date;
    /// `ScheduleError::Unresolvable` if the local time cannot be placed in the zone.
    pub fn resolve(
        &self,
        clock: ClockTime,
        meridiem: Option<Meridiem>,
        month: Option<Month>,
        day_of_month: Option<u32>,
        weekdays: Option<WeekdaySet>,
    ) -> Result<ResolvedInstant> {
        let meridiem = meridiem
            .ok_or_else(|| ScheduleError::malformed(clock.to_string(), "missing AM/PM"))?;
        let time = clock.with_meridiem(meridiem);

        let date = match (day_of_month, weekdays) {
            (Some(day), _) => {
                let month = month.map_or(self.today.month(), |m| m.number_from_month());
                NaiveDate::from_ymd_opt(self.reference_year, month, day).ok_or_else(|| {
                    ScheduleError::malformed(
                        format!("{}-{:02}-{:02}", self.reference_year, month, day),
                        "no such calendar date",
                    )
                })?
            }
            (None, Some(days)) if !days.is_empty() => self.soonest_date(days),
            (None, _) => self.today,
        };

        self.localize(date.and_time(time))
    }

    /// Attach the zone to a naive local datetime.
    ///
    /// Ambiguous times follow the [`DstPolicy`]. Nonexistent times move forward
    /// in 30-minute steps until they exist.
    pub fn localize(&self, local: NaiveDateTime) -> Result<ResolvedInstant> {
        for step in 0..=GAP_MAX_STEPS {
            let candidate = local + Duration::minutes(step * GAP_STEP_MINUTES);
            let resolved = match self.tz.from_local_datetime(&candidate) {
                LocalResult::Single(dt) => dt,
                LocalResult::Ambiguous(earlier, later) => self.policy.choose(earlier, later),
                LocalResult::None => continue,
            };
            if step > 0 {
                tracing::warn!(%local, shifted = %candidate, "local time falls in a DST gap");
            }
            return Ok(ResolvedInstant(resolved));
        }
        Err(ScheduleError::Unresolvable {
            local: local.to_string(),
        })
    }

    pub fn localize_date_time(&self, date: NaiveDate, time: NaiveTime) -> Result<ResolvedInstant> {
        self.localize(date.and_time(time))
    }

    /// Repair a range whose single trailing meridiem put the start in the wrong
    /// half of the day (`11:00 - 12:15 PM` reads as 23:00-12:15).
    ///
    /// If `start > end`, the start moves back 12 hours of wall-clock time. The
    /// result always has `start < end`, so applying this twice changes nothing.
    ///
    /// # Errors
    /// `ScheduleError::MalformedFragment` if the range is still empty or
    /// inverted after the adjustment.
    pub fn correct_start_end(
        &self,
        start: ResolvedInstant,
        end: ResolvedInstant,
    ) -> Result<(ResolvedInstant, ResolvedInstant)> {
        let start = if start > end {
            let shifted = self.localize(start.naive_local() - Duration::hours(12))?;
            tracing::warn!(
                original = %start.to_iso(),
                corrected = %shifted.to_iso(),
                "start after end, moved start back 12 hours"
            );
            shifted
        } else {
            start
        };

        if start >= end {
            return Err(ScheduleError::malformed(
                format!("{} - {}", start.to_iso(), end.to_iso()),
                "start time is not before end time",
            ));
        }
        Ok((start, end))
    }
}
