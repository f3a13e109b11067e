//! Two-line tip for a single task
//!
//! Never fails: when the model is unavailable or says nothing usable, a
//! time-of-day template is returned instead.

use dayflow_common::time::{format_12h, format_duration, TimeOfDay};

use super::llm::{CompletionRequest, TextModel};

const BULLET: &str = "• ";
const MAX_LINES: usize = 2;

const SYSTEM_PROMPT: &str = "You are a concise productivity assistant. Reply with exactly \
two short bullet points, one per line, each starting with '• '. No preamble.";

/// A validated task, as described by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetails {
    pub title: String,
    pub description: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub category: Option<String>,
}

impl TaskDetails {
    fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

pub fn build_prompt(task: &TaskDetails) -> String {
    let mut prompt = format!(
        "Task: {}\nTime: {} to {} ({})\n",
        task.title.trim(),
        format_12h(task.start_time),
        format_12h(task.end_time),
        format_duration(task.duration()),
    );
    if let Some(category) = task.category.as_deref().filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("Category: {}\n", category.trim()));
    }
    if let Some(description) = task.description.as_deref().filter(|d| !d.trim().is_empty()) {
        prompt.push_str(&format!("Details: {}\n", description.trim()));
    }
    prompt.push_str("\nGive two practical tips for getting the most out of this time slot.");
    prompt
}

/// First two non-empty lines, each with a `• ` bullet
pub fn normalize_insight(text: &str) -> Option<String> {
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| matches!(c, '•' | '-' | '*' | '·'))
                .trim()
        })
        .filter(|line| !line.is_empty())
        .take(MAX_LINES)
        .map(|line| format!("{}{}", BULLET, line))
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Deterministic tip keyed by the task's time of day
pub fn fallback_insight(task: &TaskDetails) -> String {
    let title = task.title.trim();
    let duration = format_duration(task.duration());
    match TimeOfDay::from_hours(task.start_time) {
        TimeOfDay::Morning => format!(
            "{b}Morning energy suits focused work: tackle the hardest part of \"{t}\" first.\n\
             {b}Silence notifications for the full {d} to stay in flow.",
            b = BULLET,
            t = title,
            d = duration
        ),
        TimeOfDay::Afternoon => format!(
            "{b}Energy often dips after lunch: break \"{t}\" into small steps.\n\
             {b}Take a short walk or stretch partway through the {d}.",
            b = BULLET,
            t = title,
            d = duration
        ),
        TimeOfDay::Evening => format!(
            "{b}Keep \"{t}\" light and wrap up loose ends in the evening.\n\
             {b}Stop when the {d} is up and protect your wind-down time.",
            b = BULLET,
            t = title,
            d = duration
        ),
    }
}

pub async fn task_insight(model: &dyn TextModel, task: &TaskDetails) -> String {
    let request = CompletionRequest::new(SYSTEM_PROMPT, build_prompt(task)).max_tokens(200);
    match model.complete(&request).await {
        Ok(output) => normalize_insight(&output).unwrap_or_else(|| {
            tracing::warn!(title = %task.title, "Empty task insight from model, using template");
            fallback_insight(task)
        }),
        Err(e) => {
            tracing::warn!(title = %task.title, error = %e, "Task insight failed, using template");
            fallback_insight(task)
        }
    }
}
