//! Date-range analytics report

use chrono::NaiveDate;
use dayflow_common::analytics::range_totals;
use dayflow_common::time::format_duration;
use dayflow_common::Event;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::event_store::{EventQuery, EventStore};
use super::llm::{CompletionRequest, TextModel};
use crate::error::ApiResult;

/// Summary for a range without events; no model call is made
pub const EMPTY_RANGE_SUMMARY: &str =
    "No events were scheduled in this period. Add some events to get a summary of your time.";

const SYSTEM_PROMPT: &str = "You are a productivity analyst. Summarize how a person spent \
their time in two or three sentences, then give one concrete suggestion. Plain text only.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeReport {
    pub summary: String,
    pub total_events: usize,
    pub total_hours: f64,
    pub average_events_per_day: f64,
    pub date_range: DateRange,
}

pub async fn build_range_report(
    store: &dyn EventStore,
    model: &dyn TextModel,
    user_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> ApiResult<RangeReport> {
    let events = store
        .list(user_id, EventQuery::Between(start_date, end_date))
        .await?;
    let totals = range_totals(&events, start_date, end_date);

    let summary = if events.is_empty() {
        EMPTY_RANGE_SUMMARY.to_string()
    } else {
        let request =
            CompletionRequest::new(SYSTEM_PROMPT, build_prompt(&events, start_date, end_date))
                .max_tokens(400);
        model.complete(&request).await?
    };

    tracing::info!(
        user_id,
        %start_date,
        %end_date,
        total_events = totals.total_events,
        "Built range report"
    );

    Ok(RangeReport {
        summary,
        total_events: totals.total_events,
        total_hours: totals.total_hours,
        average_events_per_day: totals.average_events_per_day,
        date_range: DateRange {
            start_date,
            end_date,
        },
    })
}

/// Hours per category, then the events themselves
pub fn build_prompt(events: &[Event], start_date: NaiveDate, end_date: NaiveDate) -> String {
    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
    for event in events {
        *by_category.entry(event.category_key()).or_default() += event.duration();
    }

    let mut prompt = format!(
        "Period: {} to {}\nEvents: {}\n\nTime by category:\n",
        start_date,
        end_date,
        events.len()
    );
    for (category, hours) in &by_category {
        prompt.push_str(&format!("- {}: {}\n", category, format_duration(*hours)));
    }
    prompt.push_str("\nEvents:\n");
    for event in events {
        prompt.push_str(&format!(
            "- {} {}: {}\n",
            event.date,
            format_duration(event.duration()),
            event.title
        ));
    }
    prompt
}
