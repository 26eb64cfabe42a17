use serde::{Deserialize, Serialize};

use super::parse::parse_flexible_number;

/// Minutes per hour
const MINUTES_PER_HOUR: i64 = 60;

/// Whole hours and minutes of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDuration {
    pub hours: u64,
    /// Always in `0..=59`
    pub minutes: u8,
}

impl WorkDuration {
    /// Decimal hours represented by this duration
    pub fn as_hours(&self) -> f64 {
        self.hours as f64 + f64::from(self.minutes) / MINUTES_PER_HOUR as f64
    }

    pub fn total_minutes(&self) -> u64 {
        self.hours * MINUTES_PER_HOUR as u64 + u64::from(self.minutes)
    }
}

/// A successful conversion: the rounded duration and the exact quotient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkTime {
    pub duration: WorkDuration,
    /// `price / wage`, unrounded
    pub hours: f64,
}

/// Outcome of converting a wage/price pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// Either input is blank
    Empty,
    /// Unparseable input, `wage <= 0` or `price < 0`
    Invalid,
    Ok(WorkTime),
}

impl Conversion {
    pub fn work_time(&self) -> Option<&WorkTime> {
        match self {
            Conversion::Ok(work_time) => Some(work_time),
            Conversion::Empty | Conversion::Invalid => None,
        }
    }
}

/// Convert decimal hours to whole hours and minutes, rounding to the
/// nearest minute (ties away from zero).
///
/// Negative or non-finite input yields zero.
pub fn hours_to_hm(hours: f64) -> WorkDuration {
    let total_minutes = (hours * MINUTES_PER_HOUR as f64).round();
    let total_minutes = if total_minutes.is_finite() && total_minutes > 0.0 {
        total_minutes as i64
    } else {
        0
    };

    WorkDuration {
        hours: (total_minutes / MINUTES_PER_HOUR) as u64,
        minutes: (total_minutes % MINUTES_PER_HOUR) as u8,
    }
}

/// Compute how long one has to work at `wage_text` per hour to pay `price_text`.
pub fn compute_duration(wage_text: &str, price_text: &str) -> Conversion {
    let wage_raw = wage_text.trim();
    let price_raw = price_text.trim();

    if wage_raw.is_empty() || price_raw.is_empty() {
        return Conversion::Empty;
    }

    let (Some(wage), Some(price)) = (
        parse_flexible_number(wage_raw),
        parse_flexible_number(price_raw),
    ) else {
        return Conversion::Invalid;
    };

    if wage <= 0.0 || price < 0.0 {
        return Conversion::Invalid;
    }

    let hours = price / wage;
    if !hours.is_finite() {
        return Conversion::Invalid;
    }

    Conversion::Ok(WorkTime {
        duration: hours_to_hm(hours),
        hours,
    })
}
