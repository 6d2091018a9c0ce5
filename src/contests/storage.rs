//! Storage operations for contests
//!
//! All contests live in a single `contests.json` array under the data
//! directory.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Contest, ContestResult};

#[derive(Error, Debug)]
pub enum ContestStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Contest not found: {0}")]
    ContestNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, ContestStorageError>;

pub struct ContestStorage {
    base_path: PathBuf,
}

impl ContestStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn contests_path(&self) -> PathBuf {
        self.base_path.join("contests.json")
    }

    fn read_all(&self) -> Result<Vec<Contest>> {
        let path = self.contests_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let contests: Vec<Contest> = serde_json::from_str(&content)?;
        Ok(contests)
    }

    fn write_all(&self, contests: &[Contest]) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        fs::write(
            self.contests_path(),
            serde_json::to_string_pretty(contests)?,
        )?;
        Ok(())
    }

    /// Add a contest to track
    pub fn add(&self, contest: Contest) -> Result<Contest> {
        let mut contests = self.read_all()?;
        contests.push(contest.clone());
        self.write_all(&contests)?;
        Ok(contest)
    }

    /// List all contests, most recent start first
    pub fn list(&self) -> Result<Vec<Contest>> {
        let mut contests = self.read_all()?;
        contests.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(contests)
    }

    /// Get a specific contest
    pub fn get(&self, contest_id: Uuid) -> Result<Contest> {
        self.read_all()?
            .into_iter()
            .find(|c| c.id == contest_id)
            .ok_or(ContestStorageError::ContestNotFound(contest_id))
    }

    /// List contests that have not started yet, soonest first
    pub fn upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Contest>> {
        let mut contests: Vec<Contest> = self
            .read_all()?
            .into_iter()
            .filter(|c| c.is_upcoming(now))
            .collect();
        contests.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(contests)
    }

    /// Record a result: marks the contest as participated
    pub fn record_result(&self, contest_id: Uuid, result: &ContestResult) -> Result<Contest> {
        let mut contests = self.read_all()?;
        let contest = contests
            .iter_mut()
            .find(|c| c.id == contest_id)
            .ok_or(ContestStorageError::ContestNotFound(contest_id))?;

        contest.participated = true;
        contest.rank = result.rank;
        contest.rating_change = result.rating_change;

        let updated = contest.clone();
        self.write_all(&contests)?;
        Ok(updated)
    }

    /// Delete a contest
    pub fn delete(&self, contest_id: Uuid) -> Result<()> {
        let mut contests = self.read_all()?;
        let before = contests.len();
        contests.retain(|c| c.id != contest_id);
        if contests.len() == before {
            return Err(ContestStorageError::ContestNotFound(contest_id));
        }
        self.write_all(&contests)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::Platform;
    use chrono::Duration;
    use tempfile::TempDir;

    fn storage() -> (TempDir, ContestStorage) {
        let dir = TempDir::new().unwrap();
        let storage = ContestStorage::new(dir.path().to_path_buf());
        (dir, storage)
    }

    #[test]
    fn test_add_and_round_trip() {
        let (_dir, storage) = storage();
        let contest = Contest::new(
            "Weekly Contest 430".to_string(),
            Platform::LeetCode,
            Utc::now() + Duration::days(2),
            90,
        );
        storage.add(contest.clone()).unwrap();

        let loaded = storage.get(contest.id).unwrap();
        assert_eq!(loaded.name, "Weekly Contest 430");
        assert!(!loaded.participated);
    }

    #[test]
    fn test_upcoming_sorted_soonest_first() {
        let (_dir, storage) = storage();
        let now = Utc::now();

        let far = Contest::new(
            "Round 990".to_string(),
            Platform::Codeforces,
            now + Duration::days(7),
            120,
        );
        let soon = Contest::new(
            "ABC 380".to_string(),
            Platform::AtCoder,
            now + Duration::days(1),
            100,
        );
        let past = Contest::new(
            "Round 980".to_string(),
            Platform::Codeforces,
            now - Duration::days(3),
            120,
        );
        storage.add(far.clone()).unwrap();
        storage.add(soon.clone()).unwrap();
        storage.add(past).unwrap();

        let upcoming = storage.upcoming(now).unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].id, soon.id);
        assert_eq!(upcoming[1].id, far.id);
    }

    #[test]
    fn test_record_result() {
        let (_dir, storage) = storage();
        let contest = Contest::new(
            "Round 985".to_string(),
            Platform::Codeforces,
            Utc::now() - Duration::days(1),
            120,
        );
        storage.add(contest.clone()).unwrap();

        let updated = storage
            .record_result(
                contest.id,
                &ContestResult {
                    rank: Some(1234),
                    rating_change: Some(-17),
                },
            )
            .unwrap();

        assert!(updated.participated);
        assert_eq!(updated.rank, Some(1234));
        assert_eq!(updated.rating_change, Some(-17));

        // Persisted
        let loaded = storage.get(contest.id).unwrap();
        assert!(loaded.participated);
    }
}
