//! Date-range summary arithmetic

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Event;
use crate::time::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeTotals {
    pub total_events: usize,
    /// Rounded to one decimal place
    pub total_hours: f64,
    /// Rounded to one decimal place; zero when the range or event list is empty
    pub average_events_per_day: f64,
}

/// Inclusive day count; zero for an inverted range
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> i64 {
    let days = (end - start).num_days();
    if days < 0 {
        0
    } else {
        days + 1
    }
}

pub fn range_totals(events: &[Event], start: NaiveDate, end: NaiveDate) -> RangeTotals {
    let total_events = events.len();
    let total_hours: f64 = events.iter().map(Event::duration).sum();
    let days = days_in_range(start, end);

    let average_events_per_day = if days == 0 || total_events == 0 {
        0.0
    } else {
        round_to(total_events as f64 / days as f64, 1)
    };

    RangeTotals {
        total_events,
        total_hours: round_to(total_hours, 1),
        average_events_per_day,
    }
}
