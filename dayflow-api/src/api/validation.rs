//! Request field validation
//!
//! Handlers run every check and report all failing fields at once.
//! Each check returns `None` exactly when it records an error, so
//! [`Validator::finish`] can hand back the parsed values.

use chrono::NaiveDate;
use dayflow_common::models::is_hex_color;
use dayflow_common::time::parse_date;

use crate::error::{ApiError, ApiResult, FieldError};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_PROMPT_CHARS: usize = 4000;

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Required `YYYY-MM-DD` date
    pub fn date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        match value.map(str::trim) {
            None | Some("") => {
                self.error(field, "is required");
                None
            }
            Some(raw) => self.parse_date(field, raw),
        }
    }

    /// Optional date; `Some(None)` when absent
    pub fn optional_date(&mut self, field: &str, value: Option<&str>) -> Option<Option<NaiveDate>> {
        match value.map(str::trim) {
            None | Some("") => Some(None),
            Some(raw) => self.parse_date(field, raw).map(Some),
        }
    }

    fn parse_date(&mut self, field: &str, raw: &str) -> Option<NaiveDate> {
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.error(field, "must be a date in YYYY-MM-DD format");
        }
        parsed
    }

    /// Decimal hours in `[0, 24)`
    pub fn start_time(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        self.hours(field, value, false)
    }

    /// Decimal hours in `[0, 24]`
    pub fn end_time(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        self.hours(field, value, true)
    }

    fn hours(&mut self, field: &str, value: Option<f64>, allow_midnight: bool) -> Option<f64> {
        let Some(hours) = value else {
            self.error(field, "is required");
            return None;
        };
        let in_range = hours.is_finite()
            && hours >= 0.0
            && (hours < 24.0 || (allow_midnight && hours == 24.0));
        if !in_range {
            let bound = if allow_midnight { "0 to 24" } else { "0 up to (not including) 24" };
            self.error(field, format!("must be decimal hours from {}", bound));
            return None;
        }
        Some(hours)
    }

    /// `end` must not precede `start`; skipped unless both parsed
    pub fn time_order(&mut self, field: &str, start: Option<f64>, end: Option<f64>) -> bool {
        match (start, end) {
            (Some(start), Some(end)) if end < start => {
                self.error(field, "must not be before startTime");
                false
            }
            _ => true,
        }
    }

    /// Non-blank, at most 200 characters
    pub fn title(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        self.text(field, value, MAX_TITLE_CHARS)
    }

    /// Non-blank, at most 4000 characters
    pub fn prompt(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        self.text(field, value, MAX_PROMPT_CHARS)
    }

    /// Prompt that may be omitted or blank
    pub fn optional_prompt(&mut self, field: &str, value: Option<&str>) -> Option<Option<String>> {
        match value.map(str::trim) {
            None | Some("") => Some(None),
            Some(_) => self.prompt(field, value).map(Some),
        }
    }

    fn text(&mut self, field: &str, value: Option<&str>, max_chars: usize) -> Option<String> {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            self.error(field, "is required");
            return None;
        }
        if trimmed.chars().count() > max_chars {
            self.error(field, format!("must be at most {} characters", max_chars));
            return None;
        }
        Some(trimmed.to_string())
    }

    /// `#RRGGBB` when present
    pub fn color_hex(&mut self, field: &str, value: Option<&str>) -> bool {
        match value {
            Some(color) if !is_hex_color(color) => {
                self.error(field, "must be a hex color like #3B82F6");
                false
            }
            _ => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> ApiError {
        ApiError::Validation(self.errors)
    }

    /// `value` when no field failed
    pub fn finish<T>(self, value: Option<T>) -> ApiResult<T> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.into_error()),
        }
    }
}

/// `prefix.name`, or `name` at the top level
pub fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
