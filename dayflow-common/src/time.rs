//! Decimal-hour time helpers
//!
//! Events store their times of day as decimal hours (`9.5` = 09:30).

use chrono::{NaiveDate, Utc};

/// Calendar date format used at every boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Coarse time-of-day bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// Before noon
    Morning,
    /// Noon until 17:00
    Afternoon,
    /// 17:00 and later
    Evening,
}

impl TimeOfDay {
    pub fn from_hours(hours: f64) -> Self {
        if hours < 12.0 {
            TimeOfDay::Morning
        } else if hours < 17.0 {
            TimeOfDay::Afternoon
        } else {
            TimeOfDay::Evening
        }
    }
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parse a clock string into decimal hours
///
/// Accepts `H`, `HH:MM`, `HH:MM:SS`, and an optional `AM`/`PM` suffix.
pub fn parse_clock(value: &str) -> Option<f64> {
    let lower = value.trim().to_ascii_lowercase();
    let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim(), Some(false))
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim(), Some(true))
    } else {
        (lower.as_str(), None)
    };

    let mut parts = clock.split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => 0,
    };
    let seconds: u32 = match parts.next() {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let hours = match meridiem {
        Some(pm) => {
            if hours == 0 || hours > 12 {
                return None;
            }
            match (hours, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None => hours,
    };
    if hours > 24 || (hours == 24 && (minutes > 0 || seconds > 0)) {
        return None;
    }

    Some(hours as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0)
}

/// Format decimal hours as `9:30 AM`
pub fn format_12h(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as u32;
    let h24 = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;
    let suffix = if h24 < 12 { "AM" } else { "PM" };
    let h12 = match h24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", h12, minutes, suffix)
}

/// Human-readable duration: `45m`, `2h`, `1h 30m`
pub fn format_duration(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as u32;
    match (total_minutes / 60, total_minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Round half-up to the given number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor + 0.5).floor() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hours(0.0), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hours(11.99), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hours(12.0), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hours(16.99), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hours(17.0), TimeOfDay::Evening);
    }

    #[test]
    fn test_parse_date_strict() {
        assert_eq!(
            parse_date("2025-03-07"),
            NaiveDate::from_ymd_opt(2025, 3, 7)
        );
        assert!(parse_date("2025-3-7").is_none());
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_date("07/03/2025").is_none());
    }

    #[test]
    fn test_parse_clock_variants() {
        assert_eq!(parse_clock("9"), Some(9.0));
        assert_eq!(parse_clock("09:30"), Some(9.5));
        assert_eq!(parse_clock("14:15:00"), Some(14.25));
        assert_eq!(parse_clock("2:30 PM"), Some(14.5));
        assert_eq!(parse_clock("12:00am"), Some(0.0));
        assert_eq!(parse_clock("12 pm"), Some(12.0));
        assert_eq!(parse_clock("24:00"), Some(24.0));
    }

    #[test]
    fn test_parse_clock_rejects_garbage() {
        assert!(parse_clock("").is_none());
        assert!(parse_clock("noon").is_none());
        assert!(parse_clock("10:75").is_none());
        assert!(parse_clock("25:00").is_none());
        assert!(parse_clock("13 pm").is_none());
        assert!(parse_clock("1:2:3:4").is_none());
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_12h(0.25), "12:15 AM");
        assert_eq!(format_12h(13.75), "1:45 PM");
        assert_eq!(format_duration(0.75), "45m");
        assert_eq!(format_duration(2.0), "2h");
        assert_eq!(format_duration(1.5), "1h 30m");
    }

    #[test]
    fn test_round_to_half_up() {
        assert_eq!(round_to(2.25, 1), 2.3);
        assert_eq!(round_to(2.0, 1), 2.0);
        assert_eq!(round_to(12.5, 0), 13.0);
    }
}
