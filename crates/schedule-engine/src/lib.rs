//! # schedule-engine
//!
//! Deterministic conversion of pasted course-schedule text into calendar events.
//!
//! A student portal prints a schedule as loosely formatted text:
//!
//! ```text
//! CS 101 - Intro
//! MWF 10:00 - 10:50 AM KEMPER 2110
//! Final Exam: Mon. Dec.15 at 8:00am
//! ```
//!
//! The engine turns that into timezone-correct events, with a weekly RRULE on
//! each class meeting that stops at the last class before finals week.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use schedule_engine::{parse_schedule, EngineConfig, FixedClock};
//!
//! let text = "CS 101 - Intro\nMWF 10:00 - 10:50 AM KEMPER 2110\nFinal Exam: Mon. Dec.15 at 8:00am\n";
//! let clock = FixedClock(Utc.with_ymd_and_hms(2025, 9, 24, 18, 0, 0).unwrap());
//! let config = EngineConfig::default().with_reference_year(2025);
//!
//! let events = parse_schedule(text, &config, &clock).unwrap();
//! assert_eq!(events.len(), 2);
//! assert_eq!(events[0].summary, "CS 101 - Intro Lecture");
//! assert_eq!(
//!     events[0].recurrence_lines(),
//!     vec!["RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20251212T235959Z"]
//! );
//! assert_eq!(events[1].summary, "CS 101 - Intro Final Exam");
//! ```
//!
//! ## Modules
//!
//! - [`normalize`]: entity un-escaping, NFKC, whitespace; the input guard
//! - [`segment`]: text → one block per course
//! - [`meeting`]: block → lecture/discussion meetings
//! - [`final_exam`]: block → optional final exam
//! - [`resolver`]: clock readings → zone-localized instants
//! - [`recurrence`]: weekly RRULE synthesis, parsing and expansion
//! - [`assemble`]: meetings + exams → calendar events
//! - [`validate`]: structural checks and `is_ongoing`
//! - [`format`]: human-readable previews
//! - [`config`], [`clock`], [`dst`], [`error`]

pub mod assemble;
pub mod clock;
pub mod config;
pub mod dst;
pub mod error;
pub mod event;
pub mod final_exam;
pub mod format;
pub mod meeting;
pub mod normalize;
mod patterns;
pub mod recurrence;
pub mod resolver;
pub mod segment;
pub mod types;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, MissingFinalPolicy, ReminderPolicy};
pub use dst::DstPolicy;
pub use error::{Result, ScheduleError};
pub use event::{CalendarEvent, EventDateTime, Reminders};
pub use format::{describe_datetime, describe_recurrence};
pub use normalize::{guard_input, normalize, prepare_input};
pub use recurrence::{expand_occurrences, synthesize, Occurrence, RecurrenceRule};
pub use resolver::{DateTimeResolver, ResolvedInstant};
pub use types::{MeetingKind, WeekdaySet};
pub use validate::{is_ongoing, is_ongoing_json, validate_event, validate_structure};

/// Parse already-guarded schedule text into calendar events.
///
/// The text is normalized first, so callers may pass raw portal text that has
/// passed [`guard_input`]; use [`parse_untrusted`] to run the guard too.
/// Blocks are processed in order and the result is all-or-nothing: a malformed
/// fragment anywhere fails the whole call.
///
/// # Errors
/// Any [`ScheduleError`] from extraction, resolution, recurrence or validation.
pub fn parse_schedule(
    text: &str,
    config: &EngineConfig,
    clock: &dyn Clock,
) -> Result<Vec<CalendarEvent>> {
    let text = normalize(text);
    let resolver = DateTimeResolver::new(
        config.timezone,
        config.dst,
        clock.now(),
        config.reference_year,
    );

    let mut events = Vec::new();
    for block in segment::segment(&text) {
        let meetings = meeting::extract_meetings(&block)?;
        let exam = final_exam::extract_final_exam(&block)?;
        events.extend(assemble::assemble_course(
            &block,
            &meetings,
            exam.as_ref(),
            &resolver,
            config,
        )?);
    }

    for event in &events {
        validate_event(event)?;
    }

    tracing::info!(
        events = events.len(),
        recurring = events.iter().filter(|e| e.is_recurring()).count(),
        "schedule parsed"
    );
    Ok(events)
}

/// [`prepare_input`] followed by [`parse_schedule`].
///
/// # Errors
/// Guard failures (`EmptyInput`, `InputTooLong`, `DisallowedCharacter`) plus
/// everything [`parse_schedule`] can return.
pub fn parse_untrusted(
    raw: &str,
    config: &EngineConfig,
    clock: &dyn Clock,
) -> Result<Vec<CalendarEvent>> {
    let text = prepare_input(raw, config.max_input_chars)?;
    parse_schedule(&text, config, clock)
}
