//! Natural-language and image schedule parsing
//!
//! The model is asked for `{"events": [...]}`; whatever comes back is
//! normalized leniently. Entries that cannot become a valid event are
//! dropped with a warning, but output with no readable JSON at all is an
//! error.

use chrono::NaiveDate;
use dayflow_common::models::{is_hex_color, DEFAULT_COLOR_HEX, DEFAULT_EMOJI};
use dayflow_common::time::{parse_clock, parse_date};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::llm::{
    extract_json_array, extract_json_object, strip_code_fences, CompletionRequest, ImageInput,
    LlmError, TextModel, VisionModel,
};

const SYSTEM_PROMPT: &str = r##"You convert schedule descriptions into calendar events.
Respond with a JSON object of the form {"events": [...]} and nothing else.
Each event has:
- "title": short name of the activity
- "description": one sentence, may be empty
- "startTime": decimal hours from 0 to 24 (9.5 means 09:30)
- "endTime": decimal hours, after startTime
- "date": YYYY-MM-DD
- "emoji": a single emoji that fits the activity
- "colorHex": a color like "#3B82F6"
If no duration is given, assume one hour. Relative days ("tomorrow", "Friday")
are resolved against the reference date."##;

const DEFAULT_IMAGE_PROMPT: &str =
    "Extract every scheduled event visible in the attached image(s).";

/// One event extracted from model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEvent {
    pub title: String,
    pub description: String,
    pub start_time: f64,
    pub end_time: f64,
    pub date: NaiveDate,
    pub emoji: String,
    pub color_hex: String,
}

/// Model-side event, accepting the spellings models tend to produce
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "start_time", alias = "start")]
    start_time: Option<HoursValue>,
    #[serde(default, alias = "end_time", alias = "end")]
    end_time: Option<HoursValue>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default, alias = "color_hex", alias = "color")]
    color_hex: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HoursValue {
    Number(f64),
    Text(String),
}

impl HoursValue {
    fn hours(&self) -> Option<f64> {
        match self {
            HoursValue::Number(n) => Some(*n),
            HoursValue::Text(s) => s.trim().parse::<f64>().ok().or_else(|| parse_clock(s)),
        }
    }
}

pub fn build_text_prompt(prompt: &str, reference_date: NaiveDate) -> CompletionRequest {
    CompletionRequest::new(
        SYSTEM_PROMPT,
        format!(
            "Reference date: {} ({})\n\nRequest: {}",
            reference_date,
            reference_date.format("%A"),
            prompt.trim()
        ),
    )
    .max_tokens(2048)
    .json_object()
}

pub fn build_image_prompt(
    prompt: Option<&str>,
    reference_date: NaiveDate,
    image_count: usize,
) -> CompletionRequest {
    let instruction = prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_IMAGE_PROMPT);
    CompletionRequest::new(
        SYSTEM_PROMPT,
        format!(
            "Reference date: {} ({})\nImages attached: {}\n\nRequest: {}",
            reference_date,
            reference_date.format("%A"),
            image_count,
            instruction
        ),
    )
    .max_tokens(4096)
    .json_object()
}

/// The list of raw event values in model output
fn locate_events(text: &str) -> Option<Vec<Value>> {
    let candidates = [
        Some(strip_code_fences(text)),
        extract_json_object(text),
        extract_json_array(text),
    ];
    for candidate in candidates.into_iter().flatten() {
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Array(items)) => return Some(items),
            Ok(Value::Object(mut map)) => {
                if let Some(Value::Array(items)) = map.remove("events") {
                    return Some(items);
                }
            }
            _ => {}
        }
    }
    None
}

fn normalize(raw: RawEvent, reference_date: NaiveDate) -> Result<ParsedEvent, String> {
    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or("missing title")?;

    let start_time = raw
        .start_time
        .as_ref()
        .and_then(HoursValue::hours)
        .ok_or("missing or unreadable startTime")?;
    let end_time = raw
        .end_time
        .as_ref()
        .and_then(HoursValue::hours)
        .ok_or("missing or unreadable endTime")?;
    if !(0.0..24.0).contains(&start_time) || !(0.0..=24.0).contains(&end_time) {
        return Err(format!("times out of range: {}-{}", start_time, end_time));
    }
    if end_time < start_time {
        return Err(format!("endTime {} before startTime {}", end_time, start_time));
    }

    let date = match raw.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => parse_date(d).ok_or_else(|| format!("invalid date '{}'", d))?,
        None => reference_date,
    };

    let emoji = raw
        .emoji
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EMOJI.to_string());
    let color_hex = raw
        .color_hex
        .map(|c| c.trim().to_string())
        .filter(|c| is_hex_color(c))
        .unwrap_or_else(|| DEFAULT_COLOR_HEX.to_string());

    Ok(ParsedEvent {
        title,
        description: raw.description.unwrap_or_default().trim().to_string(),
        start_time,
        end_time,
        date,
        emoji,
        color_hex,
    })
}

/// Normalize model output into events
pub fn parse_events(text: &str, reference_date: NaiveDate) -> Result<Vec<ParsedEvent>, LlmError> {
    let items = locate_events(text)
        .ok_or_else(|| LlmError::Parse("no JSON events in model output".to_string()))?;

    let mut events = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<RawEvent>(item)
            .map_err(|e| e.to_string())
            .and_then(|raw| normalize(raw, reference_date));
        match parsed {
            Ok(event) => events.push(event),
            Err(reason) => tracing::warn!(index, %reason, "Dropping unparseable event"),
        }
    }
    Ok(events)
}

pub async fn parse_with_text_model(
    model: &dyn TextModel,
    prompt: &str,
    reference_date: NaiveDate,
) -> Result<Vec<ParsedEvent>, LlmError> {
    let output = model
        .complete(&build_text_prompt(prompt, reference_date))
        .await?;
    let events = parse_events(&output, reference_date)?;
    tracing::debug!(model = model.model_name(), count = events.len(), "Parsed schedule");
    Ok(events)
}

pub async fn parse_with_vision_model(
    model: &dyn VisionModel,
    images: &[ImageInput],
    prompt: Option<&str>,
    reference_date: NaiveDate,
) -> Result<Vec<ParsedEvent>, LlmError> {
    let request = build_image_prompt(prompt, reference_date, images.len());
    let output = model.complete_with_images(&request, images).await?;
    let events = parse_events(&output, reference_date)?;
    tracing::debug!(
        model = model.model_name(),
        images = images.len(),
        count = events.len(),
        "Parsed schedule from images"
    );
    Ok(events)
}
