//! Compiled patterns for the portal's schedule grammar.
//!
//! All patterns assume [`crate::normalize::normalize`] has run: single spaces,
//! `\n` line endings, ASCII punctuation.

use regex::Regex;
use std::sync::LazyLock;

/// `CS 101 - ` / `ECS 036A - `: department, course number, dash.
/// The title that follows is cut by [`crate::segment`], not by this pattern.
pub(crate) static COURSE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<dept>[A-Z]{2,4}) ?(?P<number>\d{2,3}[A-Z]?)\b *- *")
        .expect("valid course header regex")
});

/// Head of a meeting: `MWF 10:00 - 10:50 AM` in `MWF 10:00 - 10:50 AM KEMPER 2110`.
///
/// The trailing meridiem applies to both times unless the start carries its own.
/// The location is free text after the head and is cut by [`crate::meeting`].
pub(crate) static MEETING_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?P<days>[MTWRFSU]+(?:/[MTWRFSU]+)*) +",
        r"(?P<start>\d{1,2}:\d{2})(?: ?(?P<start_mer>[AaPp]\.?[Mm]\b\.?))? ?- ?",
        r"(?P<end>\d{1,2}:\d{2})(?: ?(?P<mer>[AaPp]\.?[Mm]\b\.?))?",
    ))
    .expect("valid meeting head regex")
});

/// `Final Exam: Mon. Dec.15 at 8:00am` and `Final Exam: Monday, December 15, 2025 at 8:00 AM`
pub(crate) static FINAL_EXAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"Final Exam: ?(?:[A-Za-z]+\.?,? )?",
        r"(?P<month>(?i:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec))[A-Za-z]*\.? ?",
        r"(?P<day>\d{1,2})(?:,? ?(?P<year>\d{4}))?,? at ?",
        r"(?P<time>\d{1,2}:\d{2}) ?(?P<mer>[AaPp]\.?[Mm]\.?)",
    ))
    .expect("valid final exam regex")
});

pub(crate) const FINAL_EXAM_LITERAL: &str = "Final Exam:";
