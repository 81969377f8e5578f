//! Final-exam extraction.
//!
//! Only the start is listed on the portal; the end is derived from the
//! configured exam length.

use chrono::{Month, NaiveDate, NaiveTime};

use crate::error::{Result, ScheduleError};
use crate::patterns::FINAL_EXAM;
use crate::segment::CourseBlock;
use crate::types::{ClockTime, Meridiem};

#[derive(Debug, Clone, PartialEq)]
pub struct FinalExamSpec {
    pub month: Month,
    pub day_of_month: u32,
    /// Explicit year when the portal prints one; otherwise the reference year applies.
    pub year: Option<i32>,
    pub start_clock: ClockTime,
    pub meridiem: Meridiem,
}

impl FinalExamSpec {
    pub fn start_time(&self) -> NaiveTime {
        self.start_clock.with_meridiem(self.meridiem)
    }

    /// The exam's calendar date in `reference_year` unless the text named a year.
    ///
    /// # Errors
    /// `ScheduleError::MalformedFragment` for a day that does not exist in the month.
    pub fn date(&self, reference_year: i32) -> Result<NaiveDate> {
        let year = self.year.unwrap_or(reference_year);
        NaiveDate::from_ymd_opt(year, self.month.number_from_month(), self.day_of_month)
            .ok_or_else(|| {
                ScheduleError::malformed(
                    format!("{} {} {}", self.month.name(), self.day_of_month, year),
                    "no such calendar date",
                )
            })
    }
}

/// Find the block's final exam, if it lists one. Only the first listing counts.
///
/// # Errors
/// `ScheduleError::MalformedFragment` if the matched line has an out-of-range
/// day or clock time.
pub fn extract_final_exam(block: &CourseBlock<'_>) -> Result<Option<FinalExamSpec>> {
    let Some(caps) = FINAL_EXAM.captures(block.span) else {
        return Ok(None);
    };
    let fragment = caps.get(0).map_or("", |m| m.as_str());
    let field = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str())
            .ok_or_else(|| ScheduleError::malformed(fragment, format!("missing {}", name)))
    };

    let month = parse_month(field("month")?)
        .ok_or_else(|| ScheduleError::malformed(fragment, "unknown month"))?;
    let day_of_month: u32 = field("day")?
        .parse()
        .map_err(|_| ScheduleError::malformed(fragment, "day is not a number"))?;
    if !(1..=31).contains(&day_of_month) {
        return Err(ScheduleError::malformed(
            fragment,
            "day must be between 1 and 31",
        ));
    }
    let year = caps
        .name("year")
        .map(|m| m.as_str().parse::<i32>())
        .transpose()
        .map_err(|_| ScheduleError::malformed(fragment, "year is not a number"))?;

    let exam = FinalExamSpec {
        month,
        day_of_month,
        year,
        start_clock: field("time")?.parse()?,
        meridiem: field("mer")?.parse()?,
    };
    tracing::debug!(
        course = %block.course_name(),
        month = exam.month.name(),
        day = exam.day_of_month,
        "final exam found"
    );
    Ok(Some(exam))
}

fn parse_month(abbrev: &str) -> Option<Month> {
    match abbrev.to_ascii_lowercase().as_str() {
        "jan" => Some(Month::January),
        "feb" => Some(Month::February),
        "mar" => Some(Month::March),
        "apr" => Some(Month::April),
        "may" => Some(Month::May),
        "jun" => Some(Month::June),
        "jul" => Some(Month::July),
        "aug" => Some(Month::August),
        "sep" => Some(Month::September),
        "oct" => Some(Month::October),
        "nov" => Some(Month::November),
        "dec" => Some(Month::December),
        _ => None,
    }
}
