//! Storage operations for todos
//!
//! All todos live in a single `todos.json` array under the data directory.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use super::models::Todo;

#[derive(Error, Debug)]
pub enum TodoStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Todo not found: {0}")]
    TodoNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, TodoStorageError>;

pub struct TodoStorage {
    base_path: PathBuf,
}

impl TodoStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn todos_path(&self) -> PathBuf {
        self.base_path.join("todos.json")
    }

    fn read_all(&self) -> Result<Vec<Todo>> {
        let path = self.todos_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let todos: Vec<Todo> = serde_json::from_str(&content)?;
        Ok(todos)
    }

    fn write_all(&self, todos: &[Todo]) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        fs::write(self.todos_path(), serde_json::to_string_pretty(todos)?)?;
        Ok(())
    }

    /// Add a new todo
    pub fn add(&self, todo: Todo) -> Result<Todo> {
        let mut todos = self.read_all()?;
        todos.push(todo.clone());
        self.write_all(&todos)?;
        Ok(todo)
    }

    /// List todos, highest priority first, pending before done
    pub fn list(&self, pending_only: bool) -> Result<Vec<Todo>> {
        let mut todos = self.read_all()?;
        if pending_only {
            todos.retain(|t| !t.is_done);
        }
        todos.sort_by(|a, b| {
            a.is_done
                .cmp(&b.is_done)
                .then(b.priority.cmp(&a.priority))
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(todos)
    }

    /// Get a specific todo
    pub fn get(&self, todo_id: Uuid) -> Result<Todo> {
        self.read_all()?
            .into_iter()
            .find(|t| t.id == todo_id)
            .ok_or(TodoStorageError::TodoNotFound(todo_id))
    }

    /// Mark a todo done
    pub fn complete(&self, todo_id: Uuid) -> Result<Todo> {
        let mut todos = self.read_all()?;
        let todo = todos
            .iter_mut()
            .find(|t| t.id == todo_id)
            .ok_or(TodoStorageError::TodoNotFound(todo_id))?;
        todo.complete();
        let completed = todo.clone();
        self.write_all(&todos)?;
        Ok(completed)
    }

    /// Delete a todo
    pub fn delete(&self, todo_id: Uuid) -> Result<()> {
        let mut todos = self.read_all()?;
        let before = todos.len();
        todos.retain(|t| t.id != todo_id);
        if todos.len() == before {
            return Err(TodoStorageError::TodoNotFound(todo_id));
        }
        self.write_all(&todos)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todos::models::Priority;
    use tempfile::TempDir;

    fn storage() -> (TempDir, TodoStorage) {
        let dir = TempDir::new().unwrap();
        let storage = TodoStorage::new(dir.path().to_path_buf());
        (dir, storage)
    }

    #[test]
    fn test_add_and_list() {
        let (_dir, storage) = storage();
        storage.add(Todo::new("upsolve div2 D".to_string())).unwrap();
        storage
            .add(Todo::new("review DP notes".to_string()).with_priority(Priority::High))
            .unwrap();

        let todos = storage.list(false).unwrap();
        assert_eq!(todos.len(), 2);
        // High priority first
        assert_eq!(todos[0].title, "review DP notes");
    }

    #[test]
    fn test_complete_and_pending_filter() {
        let (_dir, storage) = storage();
        let todo = storage.add(Todo::new("redo graph set".to_string())).unwrap();

        let done = storage.complete(todo.id).unwrap();
        assert!(done.is_done);
        assert!(done.completed_at.is_some());

        assert!(storage.list(true).unwrap().is_empty());
        assert_eq!(storage.list(false).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_dir, storage) = storage();
        let todo = storage.add(Todo::new("x".to_string())).unwrap();

        storage.delete(todo.id).unwrap();
        assert!(storage.list(false).unwrap().is_empty());
        assert!(matches!(
            storage.delete(todo.id),
            Err(TodoStorageError::TodoNotFound(_))
        ));
    }
}
