//! WASM bindings for schedule-engine.
//!
//! Exposes schedule parsing, event validation and preview formatting to
//! JavaScript via `wasm-bindgen`. Events cross the boundary as JSON strings in
//! the calendar provider's event shape.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p schedule-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/schedule_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use schedule_engine::{
    describe_recurrence, is_ongoing_json, parse_untrusted, validate_structure, Clock,
    EngineConfig, FixedClock, SystemClock,
};
use serde_json::Value;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_event_json(json: &str) -> Result<Value, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid event JSON: {}", e))
}

fn parse_schedule_impl(
    text: &str,
    now: Option<&str>,
    config_json: Option<&str>,
) -> Result<String, String> {
    let config: EngineConfig = match config_json {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("Invalid config JSON: {}", e))?,
        None => EngineConfig::default(),
    };
    let clock: Box<dyn Clock> = match now {
        Some(now) => Box::new(FixedClock(parse_now(now)?)),
        None => Box::new(SystemClock),
    };

    let events = parse_untrusted(text, &config, clock.as_ref()).map_err(|e| e.to_string())?;
    serde_json::to_string(&events).map_err(|e| format!("Serialization error: {}", e))
}

fn validate_event_impl(event_json: &str) -> Result<(), String> {
    validate_structure(&parse_event_json(event_json)?).map_err(|e| e.to_string())
}

fn is_ongoing_impl(event_json: &str, now: &str) -> Result<bool, String> {
    Ok(is_ongoing_json(&parse_event_json(event_json)?, parse_now(now)?))
}

fn describe_recurrence_impl(lines_json: &str) -> Result<String, String> {
    let lines: Vec<String> = serde_json::from_str(lines_json)
        .map_err(|e| format!("Invalid recurrence JSON: {}", e))?;
    Ok(describe_recurrence(&lines))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Parse pasted schedule text into a JSON array of calendar events.
///
/// # Arguments
/// - `text` -- raw schedule text as copied from the portal
/// - `now_iso` -- optional RFC 3339 instant to use as "now" (defaults to the system clock)
/// - `config_json` -- optional engine configuration, e.g. `{"timezone":"America/Chicago"}`
#[wasm_bindgen(js_name = "parseSchedule")]
pub fn parse_schedule(
    text: &str,
    now_iso: Option<String>,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    parse_schedule_impl(text, now_iso.as_deref(), config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Throw unless the event JSON has `summary`, `location`, `start.dateTime`
/// and `end.dateTime`.
#[wasm_bindgen(js_name = "validateEvent")]
pub fn validate_event(event_json: &str) -> Result<(), JsValue> {
    validate_event_impl(event_json).map_err(|e| JsValue::from_str(&e))
}

/// Whether the event can still occur at or after `now_iso`.
#[wasm_bindgen(js_name = "isOngoing")]
pub fn is_ongoing(event_json: &str, now_iso: &str) -> Result<bool, JsValue> {
    is_ongoing_impl(event_json, now_iso).map_err(|e| JsValue::from_str(&e))
}

/// Describe an event's `recurrence` array (as JSON) in plain English.
#[wasm_bindgen(js_name = "describeRecurrence")]
pub fn describe_recurrence_js(lines_json: &str) -> Result<String, JsValue> {
    describe_recurrence_impl(lines_json).map_err(|e| JsValue::from_str(&e))
}
