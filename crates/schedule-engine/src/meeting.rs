//! Meeting extraction: every `DAYS START - END [AM|PM] LOCATION` occurrence in a block.
//!
//! A course may list several meetings (lecture plus discussion, or split day
//! groups). The kind is never read from the text; it is derived from how many
//! distinct weekdays the meeting occupies.

use crate::error::{Result, ScheduleError};
use crate::patterns::{FINAL_EXAM_LITERAL, MEETING_HEAD};
use crate::segment::CourseBlock;
use crate::types::{ClockTime, Meridiem, MeetingKind, WeekdaySet};

#[derive(Debug, Clone, PartialEq)]
pub struct MeetingSpec {
    pub weekdays: WeekdaySet,
    pub start_clock: ClockTime,
    pub end_clock: ClockTime,
    /// Meridiem of the start time. Equal to `end_meridiem` unless the start was
    /// written with its own marker.
    pub start_meridiem: Option<Meridiem>,
    pub end_meridiem: Option<Meridiem>,
    pub location: String,
    pub kind: MeetingKind,
}

impl MeetingSpec {
    /// Meridiem used for the start time, falling back to the trailing marker.
    pub fn start_meridiem(&self) -> Option<Meridiem> {
        self.start_meridiem.or(self.end_meridiem)
    }
}

/// Scan a course block for all of its meetings, in text order.
///
/// A meeting is a head (`DAYS START - END [AM|PM]`) followed by its location
/// on the same line. The location runs to the end of the line, the next head
/// or the `Final Exam:` literal, whichever comes first. Heads with nothing
/// after them (a room wrapped onto the next line) are skipped.
///
/// # Errors
/// Returns `ScheduleError::MalformedFragment` if a matched meeting carries an
/// impossible clock time (e.g. `13:75`).
pub fn extract_meetings(block: &CourseBlock<'_>) -> Result<Vec<MeetingSpec>> {
    let text = block.span;
    let heads: Vec<_> = MEETING_HEAD.captures_iter(text).collect();
    let mut meetings = Vec::with_capacity(heads.len());

    for (i, caps) in heads.iter().enumerate() {
        let Some(head) = caps.get(0) else { continue };
        let next_head = heads
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let location = cut_location(&text[head.end()..next_head]);
        if location.is_empty() {
            tracing::warn!(
                course = %block.course_name(),
                fragment = head.as_str(),
                "meeting has no location on its line, skipped"
            );
            continue;
        }

        let fragment = head.as_str();
        let field = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str())
                .ok_or_else(|| ScheduleError::malformed(fragment, format!("missing {}", name)))
        };

        let weekdays = WeekdaySet::from_letters(field("days")?)?;
        let start_clock: ClockTime = field("start")?.parse()?;
        let end_clock: ClockTime = field("end")?.parse()?;
        let end_meridiem = caps
            .name("mer")
            .map(|m| m.as_str().parse::<Meridiem>())
            .transpose()?;
        let start_meridiem = caps
            .name("start_mer")
            .map(|m| m.as_str().parse::<Meridiem>())
            .transpose()?;

        let kind = if weekdays.len() > 1 {
            MeetingKind::Lecture
        } else {
            MeetingKind::Discussion
        };

        let meeting = MeetingSpec {
            weekdays,
            start_clock,
            end_clock,
            start_meridiem,
            end_meridiem,
            location: location.to_string(),
            kind,
        };
        tracing::debug!(
            course = %block.course_name(),
            kind = kind.label(),
            days = %weekdays.byday(),
            location = %meeting.location,
            "meeting found"
        );
        meetings.push(meeting);
    }

    Ok(meetings)
}

fn cut_location(rest: &str) -> &str {
    let mut end = rest.find('\n').unwrap_or(rest.len());
    if let Some(pos) = rest[..end].find(FINAL_EXAM_LITERAL) {
        end = pos;
    }
    rest[..end].trim()
}

/// Location to show for the course's final exam: the first lecture's room,
/// else the first meeting's room, else empty.
pub fn final_exam_location(meetings: &[MeetingSpec]) -> String {
    meetings
        .iter()
        .find(|m| m.kind == MeetingKind::Lecture)
        .or_else(|| meetings.first())
        .map(|m| m.location.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_stops_at_line_end() {
        assert_eq!(cut_location(" KEMPER 2110\nFinal Exam: Mon."), "KEMPER 2110");
    }

    #[test]
    fn location_stops_at_final_exam_literal() {
        assert_eq!(cut_location(" TBA Final Exam: Mon. Dec.15 at 8:00am"), "TBA");
    }

    #[test]
    fn wrapped_location_is_empty() {
        assert_eq!(cut_location("\nKEMPER 2110"), "");
    }
}
