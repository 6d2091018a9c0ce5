//! Spaced repetition interval calculator
//!
//! A single parameterized SM-2 variant: early repetitions walk a preset
//! interval ladder, later ones grow multiplicatively with the quality score.
//!
//! Quality ratings (1-5):
//! - 1: Failed, no recall (full reset)
//! - 2: Failed, but the approach was familiar (partial reset)
//! - 3: Solved with serious difficulty
//! - 4: Solved after some hesitation
//! - 5: Solved cleanly, no hesitation

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default interval ladder in days, indexed by repetition count
pub const DEFAULT_INTERVALS: [i64; 8] = [1, 3, 7, 14, 30, 90, 180, 365];

/// Interval multiplier once a problem has outgrown the ladder
const DEFAULT_GROWTH_FACTOR: f64 = 2.5;

/// Extra multiplier for a perfect (quality 5) recall
const DEFAULT_PERFECT_BONUS: f64 = 1.2;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Computed review date out of range (interval of {0} days)")]
    InvalidDate(i64),
}

/// Tunable scheduling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Interval ladder in days; `intervals[n]` is the interval after the
    /// n-th successful repetition
    pub intervals: Vec<i64>,
    /// Multiplier applied past the end of the ladder
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,
    /// Extra multiplier for quality 5
    #[serde(default = "default_perfect_bonus")]
    pub perfect_bonus: f64,
}

fn default_growth_factor() -> f64 {
    DEFAULT_GROWTH_FACTOR
}

fn default_perfect_bonus() -> f64 {
    DEFAULT_PERFECT_BONUS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS.to_vec(),
            growth_factor: DEFAULT_GROWTH_FACTOR,
            perfect_bonus: DEFAULT_PERFECT_BONUS,
        }
    }
}

impl SchedulerConfig {
    pub fn with_intervals(intervals: Vec<i64>) -> Self {
        Self {
            intervals,
            ..Self::default()
        }
    }

    /// First interval of the ladder, 1 day when the ladder is empty
    fn base_interval(&self) -> i64 {
        self.intervals.first().copied().unwrap_or(1)
    }
}

/// Current scheduling state of a problem
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    /// Number of consecutive successful reviews
    pub repetition: u32,
    /// Current interval in days
    pub interval: i64,
}

/// Result of scheduling the next review
#[derive(Debug, Clone)]
pub struct ScheduledReview {
    pub repetition: u32,
    pub interval: i64,
    pub due_date: DateTime<Utc>,
}

/// Calculate the next review state from a quality rating
///
/// Quality >= 3 advances the repetition count and walks the interval ladder,
/// growing multiplicatively past its end. Quality 1 fully resets progress;
/// quality 2 halves the repetition count and re-enters the ladder there.
pub fn next_review(
    state: &ReviewState,
    quality: i32,
    config: &SchedulerConfig,
    now: DateTime<Utc>,
) -> Result<ScheduledReview, SchedulerError> {
    // Clamp quality to valid range
    let quality = quality.clamp(1, 5);

    let mut repetition = state.repetition;
    let interval;

    if quality >= 3 {
        // Successful recall
        repetition += 1;
        if (repetition as usize) < config.intervals.len() {
            interval = config.intervals[repetition as usize];
        } else {
            let mut next = state.interval as f64 * config.growth_factor * (quality as f64 / 3.0);
            if quality == 5 {
                next *= config.perfect_bonus;
            }
            interval = next.round() as i64;
        }
    } else if quality == 2 {
        // Partial reset: halve the repetition count, re-enter the ladder
        repetition /= 2;
        interval = config
            .intervals
            .get(repetition as usize)
            .copied()
            .unwrap_or_else(|| config.base_interval());
    } else {
        // Full reset
        repetition = 0;
        interval = config.base_interval();
    }

    let due_date = Duration::try_days(interval)
        .and_then(|d| now.checked_add_signed(d))
        .ok_or(SchedulerError::InvalidDate(interval))?;

    Ok(ScheduledReview {
        repetition,
        interval,
        due_date,
    })
}

/// Calculate the interval each quality rating would produce
/// Used to show users what each rating would do before they pick one
pub fn preview_intervals(state: &ReviewState, config: &SchedulerConfig) -> [i64; 5] {
    let now = Utc::now();
    let mut days = [0i64; 5];
    for (i, quality) in (1..=5).enumerate() {
        days[i] = next_review(state, quality, config, now)
            .map(|r| r.interval)
            .unwrap_or(i64::MAX);
    }
    days
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i64) -> String {
    if days == 0 {
        "now".to_string()
    } else if days == 1 {
        "1d".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        let weeks = days / 7;
        if weeks == 1 {
            "1w".to_string()
        } else {
            format!("{}w", weeks)
        }
    } else if days < 365 {
        let months = days / 30;
        if months == 1 {
            "1mo".to_string()
        } else {
            format!("{}mo", months)
        }
    } else {
        let years = days / 365;
        if years == 1 {
            "1y".to_string()
        } else {
            format!("{}y", years)
        }
    }
}
