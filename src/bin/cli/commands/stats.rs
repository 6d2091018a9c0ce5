use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.problems.stats().context("Failed to compute stats")?;
    let pending_todos = app.todos.list(true).context("Failed to list todos")?.len();
    let upcoming_contests = app
        .contests
        .upcoming(chrono::Utc::now())
        .context("Failed to list contests")?
        .len();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "problems": stats,
                "pendingTodos": pending_todos,
                "upcomingContests": upcoming_contests,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Problems: {} total", stats.total_problems);
            println!(
                "  easy {}, medium {}, hard {}",
                stats.easy, stats.medium, stats.hard
            );
            println!(
                "  {} in review, {} due now, {} reviews logged",
                stats.in_review, stats.due_now, stats.reviews_logged
            );
            println!("Todos: {} pending", pending_todos);
            println!("Contests: {} upcoming", upcoming_contests);
        }
    }

    Ok(())
}
