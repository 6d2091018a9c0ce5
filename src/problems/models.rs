//! Data models for the problem log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Judge platform a problem came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    Codeforces,
    AtCoder,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::Codeforces => "codeforces",
            Platform::AtCoder => "atcoder",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "leetcode" | "lc" => Ok(Platform::LeetCode),
            "codeforces" | "cf" => Ok(Platform::Codeforces),
            "atcoder" | "ac" => Ok(Platform::AtCoder),
            other => Err(format!("Unknown platform '{}'", other)),
        }
    }
}

/// Difficulty on the common three-level scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Bucket a Codeforces problem rating
    pub fn from_codeforces_rating(rating: u32) -> Self {
        if rating < 1400 {
            Difficulty::Easy
        } else if rating < 2000 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    /// Bucket an AtCoder difficulty color
    pub fn from_atcoder_color(color: &str) -> Option<Self> {
        match color.to_lowercase().as_str() {
            "gray" | "grey" | "brown" | "green" => Some(Difficulty::Easy),
            "cyan" | "blue" | "yellow" => Some(Difficulty::Medium),
            "orange" | "red" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty '{}'", other)),
        }
    }
}

/// One completed review, appended to a problem's history
///
/// Records are append-only: once written they are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    /// When the review happened
    pub date: DateTime<Utc>,
    /// Quality rating (1-5)
    pub quality: i32,
    /// Minutes spent, if tracked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Due date this review produced
    pub next_review_date: DateTime<Utc>,
    /// Interval this review produced, in days
    pub interval: i64,
}

/// What the user reports after reviewing a problem
#[derive(Debug, Clone, Default)]
pub struct ReviewOutcome {
    /// Quality rating (1-5)
    pub quality: i32,
    pub time_taken: Option<u32>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl ReviewOutcome {
    pub fn new(quality: i32) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }
}

/// A logged practice problem with its review-cycle state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: Uuid,
    pub title: String,
    pub platform: Platform,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub solved_at: DateTime<Utc>,
    /// Number of consecutive successful reviews
    #[serde(default)]
    pub repetition: u32,
    /// Current interval in days
    #[serde(default)]
    pub interval: i64,
    /// When the next review is due; None until review tracking starts
    pub next_review_date: Option<DateTime<Utc>>,
    /// Whether the problem is in the review cycle
    #[serde(default)]
    pub is_review: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_history: Vec<ReviewEntry>,
    /// Running mean quality over the full history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_quality: Option<f64>,
}

impl Problem {
    pub fn new(title: String, platform: Platform, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            platform,
            difficulty,
            tags: Vec::new(),
            url: None,
            notes: None,
            solved_at: Utc::now(),
            repetition: 0,
            interval: 0,
            next_review_date: None,
            is_review: false,
            review_history: Vec::new(),
            average_quality: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    /// Whether the problem is due for review at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review_date {
            Some(due) => due <= now,
            None => false,
        }
    }

    /// Apply a completed review: update scheduling state, append to the
    /// history, and recompute the running mean quality
    pub fn record_review(
        &mut self,
        repetition: u32,
        interval: i64,
        due_date: DateTime<Utc>,
        outcome: &ReviewOutcome,
        now: DateTime<Utc>,
    ) {
        self.repetition = repetition;
        self.interval = interval;
        self.next_review_date = Some(due_date);
        self.is_review = true;

        self.review_history.push(ReviewEntry {
            date: now,
            quality: outcome.quality.clamp(1, 5),
            time_taken: outcome.time_taken,
            notes: outcome.notes.clone(),
            tags: outcome.tags.clone(),
            next_review_date: due_date,
            interval,
        });

        let total: i32 = self.review_history.iter().map(|e| e.quality).sum();
        self.average_quality = Some(total as f64 / self.review_history.len() as f64);
    }
}

/// Aggregate counts over the problem log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStats {
    pub total_problems: usize,
    pub in_review: usize,
    pub due_now: usize,
    pub reviews_logged: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_codeforces_rating_buckets() {
        assert_eq!(Difficulty::from_codeforces_rating(800), Difficulty::Easy);
        assert_eq!(Difficulty::from_codeforces_rating(1399), Difficulty::Easy);
        assert_eq!(Difficulty::from_codeforces_rating(1400), Difficulty::Medium);
        assert_eq!(Difficulty::from_codeforces_rating(1999), Difficulty::Medium);
        assert_eq!(Difficulty::from_codeforces_rating(2000), Difficulty::Hard);
        assert_eq!(Difficulty::from_codeforces_rating(3500), Difficulty::Hard);
    }

    #[test]
    fn test_atcoder_color_buckets() {
        assert_eq!(Difficulty::from_atcoder_color("green"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_atcoder_color("Blue"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_atcoder_color("red"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_atcoder_color("purple"), None);
    }

    #[test]
    fn test_platform_parse_aliases() {
        assert_eq!("lc".parse::<Platform>().unwrap(), Platform::LeetCode);
        assert_eq!("Codeforces".parse::<Platform>().unwrap(), Platform::Codeforces);
        assert!("topcoder".parse::<Platform>().is_err());
    }

    #[test]
    fn test_is_due() {
        let now = Utc::now();
        let mut problem = Problem::new("Two Sum".to_string(), Platform::LeetCode, Difficulty::Easy);
        assert!(!problem.is_due(now));

        problem.next_review_date = Some(now - Duration::hours(1));
        assert!(problem.is_due(now));

        problem.next_review_date = Some(now + Duration::hours(1));
        assert!(!problem.is_due(now));
    }

    #[test]
    fn test_record_review_appends_and_averages() {
        let now = Utc::now();
        let mut problem = Problem::new("Two Sum".to_string(), Platform::LeetCode, Difficulty::Easy);

        problem.record_review(1, 3, now + Duration::days(3), &ReviewOutcome::new(4), now);
        problem.record_review(2, 7, now + Duration::days(7), &ReviewOutcome::new(2), now);

        assert_eq!(problem.review_history.len(), 2);
        assert!(problem.is_review);
        assert_eq!(problem.repetition, 2);
        assert_eq!(problem.interval, 7);
        assert_eq!(problem.average_quality, Some(3.0));

        // First entry is untouched by the second review
        assert_eq!(problem.review_history[0].quality, 4);
        assert_eq!(problem.review_history[0].interval, 3);
    }
}
