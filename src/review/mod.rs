//! Spaced repetition review cycle

pub mod scheduler;

pub use scheduler::{
    format_interval, next_review, preview_intervals, ReviewState, ScheduledReview,
    SchedulerConfig, SchedulerError, DEFAULT_INTERVALS,
};
