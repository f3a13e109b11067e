//! Focus block segmentation
//!
//! Each event becomes one focus block, rated by its length and by whether at
//! least 15 minutes of free time follow it before the next event starts.

use serde::{Deserialize, Serialize};

use crate::models::Event;

/// Minimum gap (hours) that counts as a break
pub const MIN_BREAK_HOURS: f64 = 0.25;

/// Blocks at least this long are excellent
pub const EXCELLENT_MIN_HOURS: f64 = 1.5;

/// Blocks shorter than this are fragmented
pub const GOOD_MIN_HOURS: f64 = 0.5;

/// Quality rating of a focus block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusQuality {
    Excellent,
    Good,
    Fragmented,
}

impl FocusQuality {
    pub fn for_duration(duration: f64) -> Self {
        if duration >= EXCELLENT_MIN_HOURS {
            FocusQuality::Excellent
        } else if duration >= GOOD_MIN_HOURS {
            FocusQuality::Good
        } else {
            FocusQuality::Fragmented
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusBlock {
    pub title: String,
    pub start_time: f64,
    pub duration: f64,
    pub quality: FocusQuality,
    pub has_break_after: bool,
    pub category: String,
}

/// One block per event, ordered by start time
///
/// The sort is stable, so events with equal start times keep their input
/// order. Adjacent blocks are never merged.
pub fn focus_blocks(events: &[Event]) -> Vec<FocusBlock> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    sorted
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let duration = event.duration();
            let has_break_after = match sorted.get(i + 1) {
                Some(next) => next.start_time - event.end_time >= MIN_BREAK_HOURS,
                None => true,
            };

            FocusBlock {
                title: event.title.clone(),
                start_time: event.start_time,
                duration,
                quality: FocusQuality::for_duration(duration),
                has_break_after,
                category: event.category.clone().unwrap_or_else(|| "other".to_string()),
            }
        })
        .collect()
}
