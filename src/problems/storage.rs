//! Storage operations for the problem log
//!
//! Directory structure under the data directory:
//! ```text
//! problems/
//! └── {problem-id}.json   # One file per logged problem
//! ```

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::review::{next_review, ReviewState, SchedulerConfig, SchedulerError};

use super::models::{Difficulty, Problem, ProblemStats, ReviewOutcome};

#[derive(Error, Debug)]
pub enum ProblemStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Problem not found: {0}")]
    ProblemNotFound(Uuid),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

pub type Result<T> = std::result::Result<T, ProblemStorageError>;

/// Storage manager for problem operations
pub struct ProblemStorage {
    base_path: PathBuf,
    scheduler_config: SchedulerConfig,
}

impl ProblemStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            scheduler_config: SchedulerConfig::default(),
        }
    }

    pub fn with_scheduler_config(base_path: PathBuf, config: SchedulerConfig) -> Self {
        Self {
            base_path,
            scheduler_config: config,
        }
    }

    fn problems_dir(&self) -> PathBuf {
        self.base_path.join("problems")
    }

    fn problem_path(&self, problem_id: Uuid) -> PathBuf {
        self.problems_dir().join(format!("{}.json", problem_id))
    }

    /// Initialize the problems directory
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.problems_dir())?;
        Ok(())
    }

    /// List all logged problems, most recently solved first
    pub fn list(&self) -> Result<Vec<Problem>> {
        let dir = self.problems_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut problems = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<Problem>(&content) {
                    Ok(problem) => problems.push(problem),
                    Err(e) => log::warn!("Skipping unreadable problem file {:?}: {}", path, e),
                }
            }
        }

        problems.sort_by(|a, b| b.solved_at.cmp(&a.solved_at));
        Ok(problems)
    }

    /// Get a specific problem
    pub fn get(&self, problem_id: Uuid) -> Result<Problem> {
        let path = self.problem_path(problem_id);
        if !path.exists() {
            return Err(ProblemStorageError::ProblemNotFound(problem_id));
        }

        let content = fs::read_to_string(&path)?;
        let problem: Problem = serde_json::from_str(&content)?;
        Ok(problem)
    }

    /// Persist a new problem
    pub fn create(&self, problem: &Problem) -> Result<()> {
        self.init()?;
        fs::write(
            self.problem_path(problem.id),
            serde_json::to_string_pretty(problem)?,
        )?;
        Ok(())
    }

    /// Update an existing problem
    pub fn update(&self, problem: &Problem) -> Result<()> {
        let path = self.problem_path(problem.id);
        if !path.exists() {
            return Err(ProblemStorageError::ProblemNotFound(problem.id));
        }
        fs::write(&path, serde_json::to_string_pretty(problem)?)?;
        Ok(())
    }

    /// Delete a problem and its review state with it
    pub fn delete(&self, problem_id: Uuid) -> Result<()> {
        let path = self.problem_path(problem_id);
        if !path.exists() {
            return Err(ProblemStorageError::ProblemNotFound(problem_id));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    /// List problems due for review at `now`, oldest due date first
    pub fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<Problem>> {
        let mut due: Vec<Problem> = self
            .list()?
            .into_iter()
            .filter(|p| p.is_due(now))
            .collect();
        due.sort_by(|a, b| a.next_review_date.cmp(&b.next_review_date));
        Ok(due)
    }

    /// Submit a review outcome for a problem
    ///
    /// Runs the scheduler, appends a history entry, recomputes the mean
    /// quality, and persists the updated problem.
    pub fn submit_review(&self, problem_id: Uuid, outcome: &ReviewOutcome) -> Result<Problem> {
        let mut problem = self.get(problem_id)?;
        let now = Utc::now();

        let state = ReviewState {
            repetition: problem.repetition,
            interval: problem.interval,
        };
        let scheduled = next_review(&state, outcome.quality, &self.scheduler_config, now)?;

        problem.record_review(
            scheduled.repetition,
            scheduled.interval,
            scheduled.due_date,
            outcome,
            now,
        );
        self.update(&problem)?;

        log::info!(
            "Reviewed '{}' (quality {}): next review in {} days",
            problem.title,
            outcome.quality.clamp(1, 5),
            scheduled.interval
        );

        Ok(problem)
    }

    /// Scheduler configuration used by `submit_review`
    pub fn scheduler_config(&self) -> &SchedulerConfig {
        &self.scheduler_config
    }

    /// Aggregate counters over the whole log
    pub fn stats(&self) -> Result<ProblemStats> {
        let problems = self.list()?;
        let now = Utc::now();

        let mut stats = ProblemStats {
            total_problems: problems.len(),
            ..Default::default()
        };

        for problem in &problems {
            if problem.is_review {
                stats.in_review += 1;
            }
            if problem.is_due(now) {
                stats.due_now += 1;
            }
            stats.reviews_logged += problem.review_history.len();

            match problem.difficulty {
                Difficulty::Easy => stats.easy += 1,
                Difficulty::Medium => stats.medium += 1,
                Difficulty::Hard => stats.hard += 1,
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::models::Platform;
    use tempfile::TempDir;

    fn storage() -> (TempDir, ProblemStorage) {
        let dir = TempDir::new().unwrap();
        let storage = ProblemStorage::with_scheduler_config(
            dir.path().to_path_buf(),
            SchedulerConfig::with_intervals(vec![1, 3, 7, 14, 30]),
        );
        storage.init().unwrap();
        (dir, storage)
    }

    fn sample_problem() -> Problem {
        Problem::new("Two Sum".to_string(), Platform::LeetCode, Difficulty::Easy)
            .with_tags(vec!["array".to_string(), "hash-map".to_string()])
    }

    #[test]
    fn test_create_get_round_trip() {
        let (_dir, storage) = storage();
        let problem = sample_problem();
        storage.create(&problem).unwrap();

        let loaded = storage.get(problem.id).unwrap();
        assert_eq!(loaded.title, "Two Sum");
        assert_eq!(loaded.platform, Platform::LeetCode);
        assert_eq!(loaded.tags, vec!["array", "hash-map"]);
        assert!(!loaded.is_review);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (_dir, storage) = storage();
        let result = storage.get(Uuid::new_v4());
        assert!(matches!(
            result,
            Err(ProblemStorageError::ProblemNotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_review_state_with_problem() {
        let (_dir, storage) = storage();
        let problem = sample_problem();
        storage.create(&problem).unwrap();

        storage
            .submit_review(problem.id, &ReviewOutcome::new(4))
            .unwrap();
        storage.delete(problem.id).unwrap();

        assert!(storage.get(problem.id).is_err());
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_submit_review_walks_ladder_and_persists() {
        let (_dir, storage) = storage();
        let problem = sample_problem();
        storage.create(&problem).unwrap();

        let after_first = storage
            .submit_review(problem.id, &ReviewOutcome::new(4))
            .unwrap();
        assert_eq!(after_first.repetition, 1);
        assert_eq!(after_first.interval, 3);
        assert!(after_first.is_review);
        assert_eq!(after_first.review_history.len(), 1);

        let after_second = storage
            .submit_review(problem.id, &ReviewOutcome::new(4))
            .unwrap();
        assert_eq!(after_second.repetition, 2);
        assert_eq!(after_second.interval, 7);

        let after_fail = storage
            .submit_review(problem.id, &ReviewOutcome::new(1))
            .unwrap();
        assert_eq!(after_fail.repetition, 0);
        assert_eq!(after_fail.interval, 1);
        assert_eq!(after_fail.review_history.len(), 3);

        // Reload from disk: history survived
        let loaded = storage.get(problem.id).unwrap();
        assert_eq!(loaded.review_history.len(), 3);
        assert_eq!(loaded.average_quality, Some(3.0));
    }

    #[test]
    fn test_list_due_sorted_oldest_first() {
        let (_dir, storage) = storage();
        let now = Utc::now();

        let mut old = sample_problem();
        old.next_review_date = Some(now - chrono::Duration::days(3));
        old.is_review = true;
        storage.create(&old).unwrap();

        let mut recent = sample_problem();
        recent.next_review_date = Some(now - chrono::Duration::days(1));
        recent.is_review = true;
        storage.create(&recent).unwrap();

        let mut future = sample_problem();
        future.next_review_date = Some(now + chrono::Duration::days(5));
        future.is_review = true;
        storage.create(&future).unwrap();

        let due = storage.list_due(now).unwrap();
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].id, old.id);
        assert_eq!(due[1].id, recent.id);
    }

    #[test]
    fn test_stats() {
        let (_dir, storage) = storage();

        let easy = sample_problem();
        storage.create(&easy).unwrap();

        let hard = Problem::new(
            "Median of Two Sorted Arrays".to_string(),
            Platform::LeetCode,
            Difficulty::Hard,
        );
        storage.create(&hard).unwrap();
        storage
            .submit_review(hard.id, &ReviewOutcome::new(3))
            .unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_problems, 2);
        assert_eq!(stats.in_review, 1);
        assert_eq!(stats.reviews_logged, 1);
        assert_eq!(stats.easy, 1);
        assert_eq!(stats.hard, 1);
        assert_eq!(stats.due_now, 0);
    }
}
