use anyhow::{Context, Result};

use grind_lib::todos::{Priority, Todo};

use crate::app::{parse_tags, short_id, App};
use crate::OutputFormat;

pub fn run_add(
    app: &App,
    title: &str,
    priority: &str,
    tags: Option<&str>,
    notes: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let priority: Priority = priority.parse().map_err(anyhow::Error::msg)?;

    let mut todo = Todo::new(title.to_string())
        .with_priority(priority)
        .with_tags(parse_tags(tags));
    todo.notes = notes;

    let todo = app.todos.add(todo).context("Failed to save todo")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": todo.id.to_string(),
                "title": todo.title,
                "priority": format!("{:?}", todo.priority).to_lowercase(),
                "tags": todo.tags,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Added todo: \"{}\"", todo.title);
            println!("  ID: {}", todo.id);
        }
    }

    Ok(())
}

pub fn run_list(app: &App, pending: bool, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let todos = app.todos.list(pending).context("Failed to list todos")?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = todos
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id.to_string(),
                        "title": t.title,
                        "priority": format!("{:?}", t.priority).to_lowercase(),
                        "tags": t.tags,
                        "isDone": t.is_done,
                        "createdAt": t.created_at.to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if todos.is_empty() {
                println!("No todos{}.", if pending { " (pending)" } else { "" });
                return Ok(());
            }

            for t in &todos {
                let check = if t.is_done { "x" } else { " " };
                let tags = if t.tags.is_empty() {
                    String::new()
                } else {
                    format!(
                        "  {}",
                        t.tags
                            .iter()
                            .map(|tag| format!("#{}", tag))
                            .collect::<Vec<_>>()
                            .join(" ")
                    )
                };
                println!(
                    "[{}] {}  {} ({:?}){}",
                    check,
                    short_id(t.id),
                    t.title,
                    t.priority,
                    tags
                );
            }
        }
    }

    Ok(())
}

pub fn run_done(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let todo = app.find_todo(query)?;
    let done = app.todos.complete(todo.id).context("Failed to complete todo")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": done.id.to_string(),
                "title": done.title,
                "completedAt": done.completed_at.map(|d| d.to_rfc3339()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Done: \"{}\"", done.title);
        }
    }

    Ok(())
}

pub fn run_rm(app: &App, query: &str) -> Result<()> {
    let todo = app.find_todo(query)?;
    app.todos.delete(todo.id).context("Failed to delete todo")?;
    println!("Deleted todo \"{}\"", todo.title);
    Ok(())
}
