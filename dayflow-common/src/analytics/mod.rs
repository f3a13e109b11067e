//! Schedule analytics
//!
//! Pure functions over a day's events. Nothing here touches the network or
//! holds state, so the functions are safe to call from any request task.
//!
//! - [`energy`]: time-of-day energy vs task type alignment
//! - [`focus`]: per-event focus blocks and break detection
//! - [`balance`]: work/life split scored against 60/25/15 targets
//! - [`range`]: totals over a date range

pub mod balance;
pub mod energy;
pub mod focus;
pub mod range;

pub use balance::{work_life_balance, BroadCategory, WorkLifeBalance};
pub use energy::{energy_heatmap, Alignment, EnergyHeatmapEntry, EnergyLabel, TaskType};
pub use focus::{focus_blocks, FocusBlock, FocusQuality};
pub use range::{range_totals, RangeTotals};

use serde::{Deserialize, Serialize};

use crate::models::Event;

/// The computed half of a day's insights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualInsights {
    pub energy_heatmap: Vec<EnergyHeatmapEntry>,
    pub focus_blocks: Vec<FocusBlock>,
    pub work_life_balance: WorkLifeBalance,
}

impl VisualInsights {
    /// Empty arrays and a zero balance
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Run all three day-level analyses
pub fn analyze_day(events: &[Event]) -> VisualInsights {
    VisualInsights {
        energy_heatmap: energy_heatmap(events),
        focus_blocks: focus_blocks(events),
        work_life_balance: work_life_balance(events),
    }
}
