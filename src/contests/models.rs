//! Contest data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::problems::Platform;

/// A tracked contest, upcoming or past
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: Uuid,
    pub name: String,
    pub platform: Platform,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub participated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_change: Option<i32>,
}

impl Contest {
    pub fn new(
        name: String,
        platform: Platform,
        start_time: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            platform,
            start_time,
            duration_minutes,
            url: None,
            participated: false,
            rank: None,
            rating_change: None,
        }
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }
}

/// Outcome of a contest the user participated in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestResult {
    pub rank: Option<u32>,
    pub rating_change: Option<i32>,
}
