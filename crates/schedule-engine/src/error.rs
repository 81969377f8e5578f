//! Error types for schedule-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("No schedule text was provided")]
    EmptyInput,

    #[error("Schedule text is {len} characters long, the limit is {max}")]
    InputTooLong { len: usize, max: usize },

    #[error("Character {ch:?} at position {position} is not allowed in schedule text")]
    DisallowedCharacter { ch: char, position: usize },

    /// A structurally matched fragment whose contents cannot be interpreted,
    /// e.g. `13:75` in a meeting line or `Feb 30` in a final-exam line.
    #[error("Malformed schedule fragment '{fragment}': {reason}")]
    MalformedFragment { fragment: String, reason: String },

    /// The backward walk from the final-exam week never reached the rule's
    /// last weekday. Signals inconsistent date math, not bad user input.
    #[error("No {weekday} found within 31 days before final exam on {anchor}")]
    RecurrenceSearchExhausted { anchor: String, weekday: String },

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Local time {local} does not exist in the configured timezone")]
    Unresolvable { local: String },
}

impl ScheduleError {
    pub(crate) fn malformed(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        ScheduleError::MalformedFragment {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
