//! Small value types shared by the extractors, resolver and recurrence code.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Canonical Mon→Sun order used for iteration and BYDAY output.
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// An ordered set of weekdays, iterated Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Parse a portal weekday token such as `MWF`, `TR` or `MW/F`.
    ///
    /// Letters: `M` Mon, `T` Tue, `W` Wed, `R` Thu, `F` Fri, `S` Sat, `U` Sun.
    /// Slashes join day groups; repeated letters are harmless.
    pub fn from_letters(token: &str) -> Result<Self> {
        let mut set = WeekdaySet::EMPTY;
        for c in token.chars() {
            let day = match c {
                'M' => Weekday::Mon,
                'T' => Weekday::Tue,
                'W' => Weekday::Wed,
                'R' => Weekday::Thu,
                'F' => Weekday::Fri,
                'S' => Weekday::Sat,
                'U' => Weekday::Sun,
                '/' => continue,
                other => {
                    return Err(ScheduleError::malformed(
                        token,
                        format!("'{}' is not a weekday letter", other),
                    ))
                }
            };
            set.insert(day);
        }
        if set.is_empty() {
            return Err(ScheduleError::malformed(token, "no weekdays given"));
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Days in Mon→Sun order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|d| self.contains(*d))
    }

    /// The last day of the set in Mon→Sun order.
    pub fn last(&self) -> Option<Weekday> {
        self.iter().last()
    }

    /// Comma-joined RFC 5545 day codes, e.g. `MO,WE,FR`.
    pub fn byday(&self) -> String {
        self.iter().map(byday_code).collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// RFC 5545 two-letter code for a weekday.
pub fn byday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Inverse of [`byday_code`]. Case-insensitive.
pub fn weekday_from_byday(code: &str) -> Option<Weekday> {
    match code.trim().to_ascii_uppercase().as_str() {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridiem {
    Am,
    Pm,
}

impl FromStr for Meridiem {
    type Err = ScheduleError;

    /// Accepts `am`, `AM`, `a.m.`, `A.M` and the `pm` equivalents.
    fn from_str(s: &str) -> Result<Self> {
        let letters: String = s
            .chars()
            .filter(|c| *c != '.')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match letters.as_str() {
            "am" => Ok(Meridiem::Am),
            "pm" => Ok(Meridiem::Pm),
            _ => Err(ScheduleError::malformed(s, "expected AM or PM")),
        }
    }
}

/// A 12-hour clock reading as written in the schedule, before a meridiem is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Convert to a 24-hour time. `12 AM` is midnight, `12 PM` is noon.
    pub fn with_meridiem(self, meridiem: Meridiem) -> NaiveTime {
        let hour = match (meridiem, self.hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, h) => h,
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, h) => h + 12,
        };
        // Hour and minute were range-checked on parse.
        NaiveTime::from_hms_opt(hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ScheduleError::malformed(s, "expected HH:MM"))?;
        let hour: u32 = h
            .trim()
            .parse()
            .map_err(|_| ScheduleError::malformed(s, "hour is not a number"))?;
        let minute: u32 = m
            .trim()
            .parse()
            .map_err(|_| ScheduleError::malformed(s, "minute is not a number"))?;
        if !(1..=12).contains(&hour) {
            return Err(ScheduleError::malformed(s, "hour must be between 1 and 12"));
        }
        if minute > 59 {
            return Err(ScheduleError::malformed(s, "minute must be between 0 and 59"));
        }
        Ok(ClockTime { hour, minute })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

/// How a meeting is labelled. Derived from the number of weekdays it meets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingKind {
    Lecture,
    Discussion,
    FinalExam,
}

impl MeetingKind {
    pub fn label(&self) -> &'static str {
        match self {
            MeetingKind::Lecture => "Lecture",
            MeetingKind::Discussion => "Discussion",
            MeetingKind::FinalExam => "Final Exam",
        }
    }

    /// Read the kind back from a summary such as `CS 101 - Intro Lecture 2`.
    pub fn from_summary(summary: &str) -> Option<MeetingKind> {
        let base = summary
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .trim_end();
        [
            MeetingKind::FinalExam,
            MeetingKind::Discussion,
            MeetingKind::Lecture,
        ]
        .into_iter()
        .find(|kind| base.ends_with(kind.label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_parse_into_canonical_order() {
        let set = WeekdaySet::from_letters("FWM").unwrap();
        assert_eq!(set.byday(), "MO,WE,FR");
        assert_eq!(set.last(), Some(Weekday::Fri));
    }

    #[test]
    fn kind_is_read_from_summary_label() {
        assert_eq!(
            MeetingKind::from_summary("ECS 036A - Software Development Discussion"),
            Some(MeetingKind::Discussion)
        );
        assert_eq!(
            MeetingKind::from_summary("CHE 118A - Organic Chemistry Lecture 2"),
            Some(MeetingKind::Lecture)
        );
        assert_eq!(
            MeetingKind::from_summary("CS 101 - Intro Final Exam"),
            Some(MeetingKind::FinalExam)
        );
        assert_eq!(MeetingKind::from_summary("Dentist"), None);
    }

    #[test]
    fn slash_groups_are_merged() {
        let set = WeekdaySet::from_letters("TR/F").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.byday(), "TU,TH,FR");
    }

    #[test]
    fn weekend_letters() {
        let set = WeekdaySet::from_letters("SU").unwrap();
        assert_eq!(set.byday(), "SA,SU");
    }

    #[test]
    fn empty_token_is_malformed() {
        assert!(WeekdaySet::from_letters("/").is_err());
    }

    #[test]
    fn clock_time_bounds() {
        assert!("0:30".parse::<ClockTime>().is_err());
        assert!("13:00".parse::<ClockTime>().is_err());
        assert!("10:60".parse::<ClockTime>().is_err());
        assert_eq!(
            "9:05".parse::<ClockTime>().unwrap(),
            ClockTime { hour: 9, minute: 5 }
        );
    }

    #[test]
    fn noon_and_midnight() {
        let twelve = ClockTime {
            hour: 12,
            minute: 0,
        };
        assert_eq!(twelve.with_meridiem(Meridiem::Am), NaiveTime::MIN);
        assert_eq!(
            twelve.with_meridiem(Meridiem::Pm),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn meridiem_variants() {
        assert_eq!("a.m.".parse::<Meridiem>().unwrap(), Meridiem::Am);
        assert_eq!("PM".parse::<Meridiem>().unwrap(), Meridiem::Pm);
        assert!("xm".parse::<Meridiem>().is_err());
    }
}
