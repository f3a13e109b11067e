//! Work/life balance scoring
//!
//! Buckets events into broad categories (with rules independent of
//! [`TaskType`](super::energy::TaskType)), converts bucket hours to
//! percentages and scores the L1 distance from the target split.

use serde::{Deserialize, Serialize};

use crate::models::Event;
use crate::time::round_to;

/// Target share of work hours, percent
pub const WORK_TARGET: i64 = 60;
/// Target share of personal hours, percent
pub const PERSONAL_TARGET: i64 = 25;
/// Target share of health hours, percent
pub const HEALTH_TARGET: i64 = 15;

/// Coarse bucket used only for balance scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadCategory {
    Work,
    Personal,
    Health,
    Other,
}

impl BroadCategory {
    /// First matching substring rule wins
    pub fn classify(category: &str) -> Self {
        let category = category.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| category.contains(n));

        if has(&["work", "meeting", "coding"]) {
            BroadCategory::Work
        } else if has(&["health", "exercise", "fitness"]) {
            BroadCategory::Health
        } else if has(&["personal", "family", "social"]) {
            BroadCategory::Personal
        } else {
            BroadCategory::Other
        }
    }
}

/// Hours per broad category
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryHours {
    pub work: f64,
    pub personal: f64,
    pub health: f64,
    pub other: f64,
}

impl CategoryHours {
    pub fn from_events(events: &[Event]) -> Self {
        let mut hours = Self::default();
        for event in events {
            let bucket = match BroadCategory::classify(&event.category_key()) {
                BroadCategory::Work => &mut hours.work,
                BroadCategory::Personal => &mut hours.personal,
                BroadCategory::Health => &mut hours.health,
                BroadCategory::Other => &mut hours.other,
            };
            *bucket += event.duration();
        }
        hours
    }

    pub fn total(&self) -> f64 {
        self.work + self.personal + self.health + self.other
    }
}

/// Percent split and score, all rounded to integers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLifeBalance {
    pub work: i64,
    pub personal: i64,
    pub health: i64,
    pub other: i64,
    pub balance_score: i64,
}

impl WorkLifeBalance {
    /// All-zero balance, used when there is nothing to score
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Score a day's events
///
/// Returns [`WorkLifeBalance::zero`] when the total is exactly zero. Totals
/// are not clamped, so inverted events reduce the hours of their bucket.
pub fn work_life_balance(events: &[Event]) -> WorkLifeBalance {
    let hours = CategoryHours::from_events(events);
    let total = hours.total();
    if total == 0.0 {
        return WorkLifeBalance::zero();
    }

    let percent = |bucket: f64| round_to(bucket / total * 100.0, 0) as i64;
    let work = percent(hours.work);
    let personal = percent(hours.personal);
    let health = percent(hours.health);
    let other = percent(hours.other);

    let deviation = (work - WORK_TARGET).abs()
        + (personal - PERSONAL_TARGET).abs()
        + (health - HEALTH_TARGET).abs();

    WorkLifeBalance {
        work,
        personal,
        health,
        other,
        balance_score: (100 - deviation).max(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(start: f64, end: f64, category: &str) -> Event {
        Event::new("e", start, end, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
            .with_category(category)
    }

    #[test]
    fn test_broad_category_rules() {
        assert_eq!(BroadCategory::classify("Work"), BroadCategory::Work);
        assert_eq!(BroadCategory::classify("team meeting"), BroadCategory::Work);
        assert_eq!(BroadCategory::classify("CODING"), BroadCategory::Work);
        assert_eq!(BroadCategory::classify("Exercise"), BroadCategory::Health);
        assert_eq!(BroadCategory::classify("fitness class"), BroadCategory::Health);
        assert_eq!(BroadCategory::classify("mental health"), BroadCategory::Health);
        assert_eq!(BroadCategory::classify("family dinner"), BroadCategory::Personal);
        assert_eq!(BroadCategory::classify("social"), BroadCategory::Personal);
        assert_eq!(BroadCategory::classify("email"), BroadCategory::Other);
        // Unlike TaskType, "call" and "deep" are not work here
        assert_eq!(BroadCategory::classify("call"), BroadCategory::Other);
        assert_eq!(BroadCategory::classify("deep focus"), BroadCategory::Other);
    }

    #[test]
    fn test_single_coding_event_scores_twenty() {
        let balance = work_life_balance(&[event(9.0, 11.0, "coding")]);
        assert_eq!(balance.work, 100);
        assert_eq!(balance.personal, 0);
        assert_eq!(balance.health, 0);
        assert_eq!(balance.balance_score, 20);
    }

    #[test]
    fn test_ideal_split_scores_hundred() {
        let balance = work_life_balance(&[
            event(8.0, 14.0, "work"),
            event(18.0, 20.5, "family"),
            event(6.5, 8.0, "exercise"),
        ]);
        assert_eq!((balance.work, balance.personal, balance.health), (60, 25, 15));
        assert_eq!(balance.balance_score, 100);
    }

    #[test]
    fn test_other_bucket_has_no_target() {
        let balance = work_life_balance(&[event(9.0, 10.0, "errands")]);
        assert_eq!(balance.other, 100);
        // |0-60| + |0-25| + |0-15| = 100
        assert_eq!(balance.balance_score, 0);
    }

    #[test]
    fn test_score_never_negative() {
        let balance = work_life_balance(&[event(19.0, 23.0, "social")]);
        assert_eq!(balance.personal, 100);
        assert_eq!(balance.balance_score, 0);
    }

    #[test]
    fn test_percentages_round_half_up() {
        // work 1h, health 1h, other 1h => 33.33% each
        let balance = work_life_balance(&[
            event(9.0, 10.0, "work"),
            event(10.0, 11.0, "fitness"),
            event(11.0, 12.0, "lunch"),
        ]);
        assert_eq!(balance.work, 33);
        assert_eq!(balance.health, 33);
        assert_eq!(balance.other, 33);

        // 1 of 8 hours = 12.5% rounds up to 13
        let balance = work_life_balance(&[event(9.0, 10.0, "family"), event(10.0, 17.0, "work")]);
        assert_eq!(balance.personal, 13);
        assert_eq!(balance.work, 88);
    }

    #[test]
    fn test_zero_total_is_all_zero() {
        assert_eq!(work_life_balance(&[]), WorkLifeBalance::zero());
        assert_eq!(
            work_life_balance(&[event(9.0, 9.0, "work")]),
            WorkLifeBalance::zero()
        );
    }

    #[test]
    fn test_missing_category_counts_as_other() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let hours = CategoryHours::from_events(&[Event::new("x", 1.0, 3.0, date)]);
        assert_eq!(hours.other, 2.0);
        assert_eq!(hours.total(), 2.0);
    }
}
