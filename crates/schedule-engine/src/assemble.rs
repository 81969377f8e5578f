//! Event assembly: resolved meetings and final exams → calendar events.

use std::collections::HashMap;

use chrono::Duration;

use crate::config::{EngineConfig, MissingFinalPolicy};
use crate::error::Result;
use crate::event::{CalendarEvent, EventDateTime, Reminders};
use crate::final_exam::FinalExamSpec;
use crate::meeting::{final_exam_location, MeetingSpec};
use crate::recurrence::{synthesize, RecurrenceRule};
use crate::resolver::DateTimeResolver;
use crate::segment::CourseBlock;
use crate::types::MeetingKind;

/// Build every event for one course: one per meeting, in text order, then the
/// final exam if the block lists one.
///
/// # Errors
/// Propagates resolution and recurrence errors; a course never yields a
/// partial event list.
pub fn assemble_course(
    block: &CourseBlock<'_>,
    meetings: &[MeetingSpec],
    final_exam: Option<&FinalExamSpec>,
    resolver: &DateTimeResolver,
    config: &EngineConfig,
) -> Result<Vec<CalendarEvent>> {
    let course = block.course_name();
    let anchor = final_exam
        .map(|exam| exam.date(resolver.reference_year()))
        .transpose()?;

    let mut seen: HashMap<MeetingKind, usize> = HashMap::new();
    let mut events = Vec::with_capacity(meetings.len() + 1);

    for meeting in meetings {
        let start = resolver.resolve(
            meeting.start_clock,
            meeting.start_meridiem(),
            None,
            None,
            Some(meeting.weekdays),
        )?;
        let end = resolver.resolve(
            meeting.end_clock,
            meeting.end_meridiem.or(meeting.start_meridiem),
            None,
            None,
            Some(meeting.weekdays),
        )?;
        let (start, end) = resolver.correct_start_end(start, end)?;

        let recurrence = match (anchor, config.missing_final) {
            (Some(anchor), _) => Some(synthesize(meeting.weekdays, anchor)?),
            (None, MissingFinalPolicy::SingleOccurrence) => None,
            (None, MissingFinalPolicy::FixedWindow { weeks }) => {
                let window_end = start.naive_local().date() + Duration::weeks(weeks as i64);
                Some(synthesize(meeting.weekdays, window_end)?)
            }
        };

        let ordinal = seen.entry(meeting.kind).or_insert(0);
        *ordinal += 1;
        let summary = match *ordinal {
            1 => format!("{} {}", course, meeting.kind.label()),
            n => format!("{} {} {}", course, meeting.kind.label(), n),
        };

        events.push(meeting_event(
            summary,
            meeting,
            start.into(),
            end.into(),
            recurrence,
            config,
        ));
    }

    if let (Some(exam), Some(date)) = (final_exam, anchor) {
        let start = resolver.localize_date_time(date, exam.start_time())?;
        let end = resolver.localize(
            start.naive_local() + Duration::minutes(config.exam_duration_minutes as i64),
        )?;
        let (start, end) = resolver.correct_start_end(start, end)?;
        let location = final_exam_location(meetings);

        events.push(CalendarEvent {
            summary: format!("{} {}", course, MeetingKind::FinalExam.label()),
            description: location.clone(),
            location,
            start: start.into(),
            end: end.into(),
            recurrence: None,
            reminders: Reminders::popups(&config.reminders.final_exam_minutes),
        });
    }

    Ok(events)
}

fn meeting_event(
    summary: String,
    meeting: &MeetingSpec,
    start: EventDateTime,
    end: EventDateTime,
    recurrence: Option<RecurrenceRule>,
    config: &EngineConfig,
) -> CalendarEvent {
    CalendarEvent {
        summary,
        location: meeting.location.clone(),
        description: meeting.location.clone(),
        start,
        end,
        recurrence,
        reminders: Reminders::popups(&config.reminders.meeting_minutes),
    }
}
