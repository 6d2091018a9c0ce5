use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use grind_lib::contests::{Contest, ContestStorage};
use grind_lib::problems::{Problem, ProblemStorage};
use grind_lib::storage;
use grind_lib::todos::{Todo, TodoStorage};

/// Shared application state for CLI commands
pub struct App {
    pub problems: ProblemStorage,
    pub todos: TodoStorage,
    pub contests: ContestStorage,
    pub data_dir: PathBuf,
}

impl App {
    /// Initialize from the default data directory, or an explicit override
    pub fn new(data_dir: Option<&str>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(path) => PathBuf::from(path),
            None => storage::default_data_dir().context("Failed to get data directory")?,
        };

        let problems = ProblemStorage::new(data_dir.clone());
        problems.init().context("Failed to initialize problem storage")?;

        Ok(Self {
            problems,
            todos: TodoStorage::new(data_dir.clone()),
            contests: ContestStorage::new(data_dir.clone()),
            data_dir,
        })
    }

    /// Find a problem by ID, ID prefix, or title prefix (case-insensitive)
    pub fn find_problem(&self, query: &str) -> Result<Problem> {
        if let Ok(id) = query.parse::<Uuid>() {
            return self.problems.get(id).context("Problem not found");
        }

        let problems = self.problems.list().context("Failed to list problems")?;
        let query_lower = query.to_lowercase();

        // ID prefix match first
        let id_matches: Vec<&Problem> = problems
            .iter()
            .filter(|p| p.id.to_string().starts_with(&query_lower))
            .collect();
        if id_matches.len() == 1 {
            return Ok(id_matches[0].clone());
        }

        // Exact title match
        if let Some(p) = problems.iter().find(|p| p.title.to_lowercase() == query_lower) {
            return Ok(p.clone());
        }

        // Title prefix match
        let matches: Vec<&Problem> = problems
            .iter()
            .filter(|p| p.title.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No problem matching '{}'", query),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous problem '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|p| format!("  - {} ({})", p.title, short_id(p.id)))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Find a todo by ID prefix or title prefix (case-insensitive)
    pub fn find_todo(&self, query: &str) -> Result<Todo> {
        if let Ok(id) = query.parse::<Uuid>() {
            return self.todos.get(id).context("Todo not found");
        }

        let todos = self.todos.list(false).context("Failed to list todos")?;
        let query_lower = query.to_lowercase();

        let id_matches: Vec<&Todo> = todos
            .iter()
            .filter(|t| t.id.to_string().starts_with(&query_lower))
            .collect();
        if id_matches.len() == 1 {
            return Ok(id_matches[0].clone());
        }

        let matches: Vec<&Todo> = todos
            .iter()
            .filter(|t| t.title.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No todo matching '{}'", query),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous todo '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|t| format!("  - {} ({})", t.title, short_id(t.id)))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Find a contest by ID prefix or name prefix (case-insensitive)
    pub fn find_contest(&self, query: &str) -> Result<Contest> {
        if let Ok(id) = query.parse::<Uuid>() {
            return self.contests.get(id).context("Contest not found");
        }

        let contests = self.contests.list().context("Failed to list contests")?;
        let query_lower = query.to_lowercase();

        let id_matches: Vec<&Contest> = contests
            .iter()
            .filter(|c| c.id.to_string().starts_with(&query_lower))
            .collect();
        if id_matches.len() == 1 {
            return Ok(id_matches[0].clone());
        }

        let matches: Vec<&Contest> = contests
            .iter()
            .filter(|c| c.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("No contest matching '{}'", query),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous contest '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|c| format!("  - {} ({})", c.name, short_id(c.id)))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }
}

/// First 8 characters of a UUID, enough to disambiguate in listings
pub fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// Split a comma-separated tag string into a clean list
pub fn parse_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
