//! Engine configuration.
//!
//! Every field has a default, so an empty TOML table (or no file at all)
//! yields the behaviour the portal format expects: Los Angeles time, two-hour
//! finals, a one-hour reminder on every class.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::normalize::DEFAULT_MAX_INPUT_CHARS;

/// What to do with a course's meetings when its block lists no final exam,
/// leaving no date to end the weekly rule on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum MissingFinalPolicy {
    /// Emit each meeting as a one-off event on its first date.
    #[default]
    SingleOccurrence,
    /// Recur as if a final exam fell `weeks` weeks after the first meeting.
    FixedWindow { weeks: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderPolicy {
    /// Popup reminders, in minutes before start, for lectures and discussions.
    pub meeting_minutes: Vec<u32>,
    /// Popup reminders, in minutes before start, for final exams.
    pub final_exam_minutes: Vec<u32>,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        ReminderPolicy {
            meeting_minutes: vec![60],
            final_exam_minutes: vec![60, 24 * 60],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timezone: Tz,
    /// Year for dates written without one. `None` means the current year in `timezone`.
    pub reference_year: Option<i32>,
    pub exam_duration_minutes: u32,
    pub max_input_chars: usize,
    pub dst: DstPolicy,
    pub missing_final: MissingFinalPolicy,
    pub reminders: ReminderPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            timezone: Tz::America__Los_Angeles,
            reference_year: None,
            exam_duration_minutes: 120,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            dst: DstPolicy::default(),
            missing_final: MissingFinalPolicy::default(),
            reminders: ReminderPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }
}
