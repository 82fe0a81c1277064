//! Input forms with client-side validation.
//!
//! # Design
//! A form owns the raw field values the user typed, enforces length limits as
//! the values are set, and validates everything else on submit. `submit` takes
//! the persisting call as a closure, so a form never knows which container or
//! service stores its payload. Validation failures never reach the closure,
//! which means no network call is made for invalid input.
//!
//! Every form walks the same state machine:
//! `Idle -> Submitting -> Succeeded | Failed`. Success clears the fields,
//! failure keeps them.

mod category;
mod subtask;
mod task;

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

use crate::notice::Notice;

pub use category::{CategoryDraft, CategoryForm};
pub use subtask::SubtaskForm;
pub use task::{TaskDraft, TaskForm};

/// Reasons a form refuses to submit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} is not a valid date and time")]
    InvalidDateTime(&'static str),

    #[error("the start date must not be after the end date")]
    DateOrder,

    #[error("a submission is already in progress")]
    Busy,

    /// The persisting call failed; carries its message verbatim.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded(Notice),
    Failed(String),
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    /// Success message, if one was raised less than three seconds before `now`.
    pub fn notice_at(&self, now: Instant) -> Option<&str> {
        match self {
            SubmitState::Succeeded(notice) if notice.is_visible_at(now) => Some(notice.message.as_str()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmitState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Drive one submission through the state machine.
///
/// `validated` is the outcome of the form's own checks. The caller clears its
/// fields when this returns `Ok`.
fn run_submission<P, R, E>(
    state: &mut SubmitState,
    validated: Result<P, FormError>,
    persist: impl FnOnce(P) -> Result<R, E>,
    success_message: &str,
) -> Result<R, FormError>
where
    E: fmt::Display,
{
    if state.is_submitting() {
        return Err(FormError::Busy);
    }
    let payload = match validated {
        Ok(payload) => payload,
        Err(err) => {
            *state = SubmitState::Failed(err.to_string());
            return Err(err);
        }
    };

    *state = SubmitState::Submitting;
    match persist(payload) {
        Ok(saved) => {
            *state = SubmitState::Succeeded(Notice::new(success_message));
            Ok(saved)
        }
        Err(err) => {
            let message = err.to_string();
            *state = SubmitState::Failed(message.clone());
            Err(FormError::Rejected(message))
        }
    }
}

/// Keep at most `max` characters, the way a `maxlength` input does.
pub(crate) fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Characters still available in a field limited to `max`.
pub(crate) fn remaining_chars(value: &str, max: usize) -> usize {
    max.saturating_sub(value.chars().count())
}

/// Non-empty after trimming, or `Required`.
pub(crate) fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(trimmed.to_string())
}

const INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Zone a form reads its date-time inputs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputZone {
    /// The host's zone, with the offset in force on each entered date.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl InputZone {
    pub fn parse(&self, value: &str, field: &'static str) -> Result<DateTime<Utc>, FormError> {
        match self {
            InputZone::Local => parse_datetime_input(value, &Local, field),
            InputZone::Fixed(offset) => parse_datetime_input(value, offset, field),
        }
    }

    pub fn format(&self, value: &DateTime<Utc>) -> String {
        match self {
            InputZone::Local => format_datetime_input(value, &Local),
            InputZone::Fixed(offset) => format_datetime_input(value, offset),
        }
    }
}

impl From<FixedOffset> for InputZone {
    fn from(offset: FixedOffset) -> Self {
        InputZone::Fixed(offset)
    }
}

/// Convert a local date-time input value (`2025-07-26T09:00`) to UTC.
///
/// The offset is the one `zone` applies on that date. A time repeated when
/// clocks go back resolves to its first occurrence; a time skipped when they
/// go forward is `InvalidDateTime`. Full RFC 3339 values are accepted as is.
pub fn parse_datetime_input<Tz: TimeZone>(
    value: &str,
    zone: &Tz,
    field: &'static str,
) -> Result<DateTime<Utc>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::Required(field));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| zone.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or(FormError::InvalidDateTime(field))
}

/// Render a UTC instant as a local date-time input value in `zone`.
pub fn format_datetime_input<Tz: TimeZone>(value: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    value.with_timezone(zone).format("%Y-%m-%dT%H:%M").to_string()
}
