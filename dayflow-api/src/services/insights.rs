//! Daily insights
//!
//! Combines the deterministic analytics for one day with five free-text
//! suggestions from the text model. An empty day never reaches the model.

use chrono::NaiveDate;
use dayflow_common::analytics::{analyze_day, VisualInsights};
use dayflow_common::time::{format_12h, format_duration};
use dayflow_common::Event;
use serde::{Deserialize, Serialize};

use super::event_store::{EventQuery, EventStore};
use super::llm::{extract_json_array, CompletionRequest, TextModel};
use crate::error::ApiResult;

/// Number of insight strings returned to the client
pub const INSIGHT_COUNT: usize = 5;

/// Returned for a day with no events
pub const CANNED_INSIGHTS: [&str; INSIGHT_COUNT] = [
    "Your schedule is clear today. Block out time for your most important task first.",
    "Plan demanding work for the late morning, when energy usually peaks.",
    "Leave short breaks between events so you have room to reset.",
    "Reserve some time for exercise or a walk to keep energy up.",
    "End the day with a quick review and a plan for tomorrow.",
];

/// Used when the model output cannot be read as a list of strings
pub const FALLBACK_INSIGHTS: [&str; INSIGHT_COUNT] = [
    "Schedule your most demanding tasks during your peak morning hours.",
    "Group meetings together to protect longer stretches of focus time.",
    "Add a 15 minute buffer between back-to-back events.",
    "Make sure personal and health time has a place in your day.",
    "Review your completed tasks tonight and adjust tomorrow's plan.",
];

const SYSTEM_PROMPT: &str = "You are a productivity coach. You review a person's daily \
schedule and give short, specific, encouraging advice. Respond with a JSON array of \
strings and nothing else.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInsights {
    pub insights: Vec<String>,
    pub visual_insights: VisualInsights,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Insights for one user's day
pub async fn generate_day_insights(
    store: &dyn EventStore,
    model: &dyn TextModel,
    user_id: &str,
    date: NaiveDate,
) -> ApiResult<DayInsights> {
    let events = store.list(user_id, EventQuery::OnDate(date)).await?;

    if events.is_empty() {
        tracing::debug!(user_id, %date, "No events, returning canned insights");
        return Ok(DayInsights {
            insights: owned(&CANNED_INSIGHTS),
            visual_insights: VisualInsights::empty(),
        });
    }

    let visual_insights = analyze_day(&events);
    let request = CompletionRequest::new(SYSTEM_PROMPT, build_prompt(date, &events)).max_tokens(800);
    let output = model.complete(&request).await?;

    let insights = match parse_insights(&output) {
        Some(insights) => insights,
        None => {
            tracing::warn!(
                user_id,
                model = model.model_name(),
                "Could not parse insights from model output, using fallback"
            );
            owned(&FALLBACK_INSIGHTS)
        }
    };

    tracing::info!(user_id, %date, events = events.len(), "Generated day insights");
    Ok(DayInsights {
        insights,
        visual_insights,
    })
}

pub fn build_prompt(date: NaiveDate, events: &[Event]) -> String {
    let mut prompt = format!("Schedule for {}:\n", date);
    for event in events {
        prompt.push_str(&format!(
            "- {} to {} ({}): {} [{}]\n",
            format_12h(event.start_time),
            format_12h(event.end_time),
            format_duration(event.duration()),
            event.title,
            event.category_key(),
        ));
    }
    prompt.push_str(&format!(
        "\nGive exactly {} actionable insights about this day: energy use, focus, \
         breaks and work/life balance. Each insight is one sentence.",
        INSIGHT_COUNT
    ));
    prompt
}

/// Insight strings from model output
///
/// Returns `None` unless the output holds a non-empty JSON array of strings.
/// Extra entries are dropped.
pub fn parse_insights(text: &str) -> Option<Vec<String>> {
    let json = extract_json_array(text)?;
    let parsed: Vec<String> = serde_json::from_str(json).ok()?;
    let mut insights: Vec<String> = parsed
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if insights.is_empty() {
        return None;
    }
    insights.truncate(INSIGHT_COUNT);
    Some(insights)
}
