use anyhow::{bail, Context, Result};

use grind_lib::problems::ReviewOutcome;
use grind_lib::review::{format_interval, preview_intervals, ReviewState};

use crate::app::{parse_tags, short_id, App};
use crate::OutputFormat;

pub fn run_due(app: &App, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let due = app
        .problems
        .list_due(chrono::Utc::now())
        .context("Failed to list due problems")?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = due
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id.to_string(),
                        "title": p.title,
                        "platform": p.platform.as_str(),
                        "repetition": p.repetition,
                        "interval": p.interval,
                        "nextReviewDate": p.next_review_date.map(|d| d.to_rfc3339()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due for review.");
                return Ok(());
            }

            println!("{} problem(s) due:", due.len());
            for p in &due {
                let overdue = p
                    .next_review_date
                    .map(|d| (chrono::Utc::now() - d).num_days())
                    .unwrap_or(0);
                let when = if overdue > 0 {
                    format!("{}d overdue", overdue)
                } else {
                    "due today".to_string()
                };
                println!(
                    "  {}  {} ({}, {})",
                    short_id(p.id),
                    p.title,
                    p.platform.as_str(),
                    when
                );
            }
        }
    }

    Ok(())
}

pub fn run_submit(
    app: &App,
    query: &str,
    quality: i32,
    minutes: Option<u32>,
    notes: Option<String>,
    tags: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    if !(1..=5).contains(&quality) {
        bail!("Quality must be between 1 and 5");
    }

    let problem = app.find_problem(query)?;
    let outcome = ReviewOutcome {
        quality,
        time_taken: minutes,
        notes,
        tags: parse_tags(tags),
    };

    let updated = app
        .problems
        .submit_review(problem.id, &outcome)
        .context("Failed to submit review")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": updated.id.to_string(),
                "title": updated.title,
                "repetition": updated.repetition,
                "interval": updated.interval,
                "nextReviewDate": updated.next_review_date.map(|d| d.to_rfc3339()),
                "averageQuality": updated.average_quality,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Reviewed \"{}\" with quality {}",
                updated.title, quality
            );
            println!(
                "  Next review in {} ({})",
                format_interval(updated.interval),
                updated
                    .next_review_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }

    Ok(())
}

pub fn run_preview(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let problem = app.find_problem(query)?;
    let state = ReviewState {
        repetition: problem.repetition,
        interval: problem.interval,
    };
    let intervals = preview_intervals(&state, app.problems.scheduler_config());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": problem.id.to_string(),
                "title": problem.title,
                "intervals": intervals,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("\"{}\"", problem.title);
            let labels = ["1 (failed)", "2 (shaky)", "3 (hard)", "4 (good)", "5 (easy)"];
            for (label, days) in labels.iter().zip(intervals.iter()) {
                println!("  {:<10} -> {}", label, format_interval(*days));
            }
        }
    }

    Ok(())
}
