//! Energy alignment classifier
//!
//! Labels each event with the energy level typical for its start hour and the
//! kind of work its category suggests, then judges whether the two fit.

use serde::{Deserialize, Serialize};

use crate::models::Event;

/// Energy level typical for a time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLabel {
    High,
    Medium,
    Low,
}

impl EnergyLabel {
    /// `[9,12)` high; `[6,9)` and `[16,19)` medium; everything else low
    pub fn for_start_time(start_time: f64) -> Self {
        if (9.0..12.0).contains(&start_time) {
            EnergyLabel::High
        } else if (6.0..9.0).contains(&start_time) || (16.0..19.0).contains(&start_time) {
            EnergyLabel::Medium
        } else {
            EnergyLabel::Low
        }
    }
}

/// Fine-grained task type used only for alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    DeepWork,
    Meetings,
    Admin,
    Creative,
    Other,
}

impl TaskType {
    /// First matching substring rule wins
    pub fn classify(category: &str) -> Self {
        let category = category.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| category.contains(n));

        if has(&["work", "coding", "deep"]) {
            TaskType::DeepWork
        } else if has(&["meeting", "call"]) {
            TaskType::Meetings
        } else if has(&["email", "admin"]) {
            TaskType::Admin
        } else if has(&["design", "creative"]) {
            TaskType::Creative
        } else {
            TaskType::Other
        }
    }
}

/// How well a task type suits its slot's energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Optimal,
    Good,
    Poor,
}

impl Alignment {
    pub fn judge(task: TaskType, energy: EnergyLabel) -> Self {
        match (task, energy) {
            (TaskType::DeepWork, EnergyLabel::High) => Alignment::Optimal,
            (TaskType::DeepWork, EnergyLabel::Low) => Alignment::Poor,
            (TaskType::Meetings, EnergyLabel::Low) => Alignment::Poor,
            (TaskType::Admin, EnergyLabel::High) => Alignment::Poor,
            _ => Alignment::Good,
        }
    }
}

/// One heatmap cell per event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyHeatmapEntry {
    pub title: String,
    pub start_time: f64,
    pub end_time: f64,
    pub optimal_energy: EnergyLabel,
    pub actual_task_type: TaskType,
    pub alignment: Alignment,
    pub category: String,
}

/// Classify every event, keeping input order
pub fn energy_heatmap(events: &[Event]) -> Vec<EnergyHeatmapEntry> {
    events
        .iter()
        .map(|event| {
            let category = event.category.clone().unwrap_or_else(|| "other".to_string());
            let optimal_energy = EnergyLabel::for_start_time(event.start_time);
            let actual_task_type = TaskType::classify(&category);

            EnergyHeatmapEntry {
                title: event.title.clone(),
                start_time: event.start_time,
                end_time: event.end_time,
                optimal_energy,
                actual_task_type,
                alignment: Alignment::judge(actual_task_type, optimal_energy),
                category,
            }
        })
        .collect()
}
