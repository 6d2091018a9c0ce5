use anyhow::{Context, Result};

use grind_lib::problems::{Difficulty, Platform, Problem};
use grind_lib::review::format_interval;

use crate::app::{parse_tags, short_id, App};
use crate::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub fn run_add(
    app: &App,
    title: &str,
    platform: &str,
    difficulty: Option<&str>,
    cf_rating: Option<u32>,
    tags: Option<&str>,
    url: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let platform: Platform = platform.parse().map_err(anyhow::Error::msg)?;

    let difficulty = match (difficulty, cf_rating) {
        (_, Some(rating)) => Difficulty::from_codeforces_rating(rating),
        (Some(d), None) => d.parse().map_err(anyhow::Error::msg)?,
        (None, None) => Difficulty::Medium,
    };

    let mut problem =
        Problem::new(title.to_string(), platform, difficulty).with_tags(parse_tags(tags));
    if let Some(url) = url {
        problem = problem.with_url(url);
    }

    app.problems
        .create(&problem)
        .context("Failed to save problem")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": problem.id.to_string(),
                "title": problem.title,
                "platform": problem.platform.as_str(),
                "difficulty": problem.difficulty.as_str(),
                "tags": problem.tags,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Logged \"{}\" ({}, {})",
                problem.title,
                problem.platform.as_str(),
                problem.difficulty.as_str()
            );
            println!("  ID: {}", problem.id);
        }
    }

    Ok(())
}

pub fn run_list(
    app: &App,
    platform: Option<&str>,
    format: &OutputFormat,
    _use_color: bool,
) -> Result<()> {
    let platform_filter: Option<Platform> = platform
        .map(|p| p.parse().map_err(anyhow::Error::msg))
        .transpose()?;

    let mut problems = app.problems.list().context("Failed to list problems")?;
    if let Some(platform) = platform_filter {
        problems.retain(|p| p.platform == platform);
    }

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = problems
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id.to_string(),
                        "title": p.title,
                        "platform": p.platform.as_str(),
                        "difficulty": p.difficulty.as_str(),
                        "tags": p.tags,
                        "solvedAt": p.solved_at.to_rfc3339(),
                        "isReview": p.is_review,
                        "nextReviewDate": p.next_review_date.map(|d| d.to_rfc3339()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if problems.is_empty() {
                println!("No problems logged yet.");
                return Ok(());
            }

            let title_width = problems
                .iter()
                .map(|p| p.title.chars().count())
                .max()
                .unwrap_or(5)
                .clamp(5, 40);

            println!(
                "{:<8} {:<tw$} {:<12} {:<8} {}",
                "ID",
                "Title",
                "Platform",
                "Diff",
                "Next review",
                tw = title_width
            );
            println!(
                "{} {} {} {} {}",
                "\u{2500}".repeat(8),
                "\u{2500}".repeat(title_width),
                "\u{2500}".repeat(12),
                "\u{2500}".repeat(8),
                "\u{2500}".repeat(11)
            );

            for p in &problems {
                let title = truncate(&p.title, title_width);
                let next = match p.next_review_date {
                    Some(d) => d.format("%Y-%m-%d").to_string(),
                    None => "-".to_string(),
                };
                println!(
                    "{:<8} {:<tw$} {:<12} {:<8} {}",
                    short_id(p.id),
                    title,
                    p.platform.as_str(),
                    p.difficulty.as_str(),
                    next,
                    tw = title_width
                );
            }
        }
    }

    Ok(())
}

pub fn run_show(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let problem = app.find_problem(query)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&problem)?);
        }
        OutputFormat::Plain => {
            println!("{}", problem.title);
            println!(
                "  {} / {}  solved {}",
                problem.platform.as_str(),
                problem.difficulty.as_str(),
                problem.solved_at.format("%Y-%m-%d")
            );
            if !problem.tags.is_empty() {
                println!(
                    "  Tags: {}",
                    problem
                        .tags
                        .iter()
                        .map(|t| format!("#{}", t))
                        .collect::<Vec<_>>()
                        .join(" ")
                );
            }
            if let Some(url) = &problem.url {
                println!("  URL: {}", url);
            }
            if problem.is_review {
                println!(
                    "  Review: repetition {}, interval {}, due {}",
                    problem.repetition,
                    format_interval(problem.interval),
                    problem
                        .next_review_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                if let Some(avg) = problem.average_quality {
                    println!("  Average quality: {:.2}", avg);
                }
            }
            if !problem.review_history.is_empty() {
                println!("  History:");
                for entry in &problem.review_history {
                    let minutes = entry
                        .time_taken
                        .map(|m| format!(", {}m", m))
                        .unwrap_or_default();
                    println!(
                        "    {}  quality {}{}  next in {}",
                        entry.date.format("%Y-%m-%d"),
                        entry.quality,
                        minutes,
                        format_interval(entry.interval)
                    );
                }
            }
            println!("  ID: {}", problem.id);
        }
    }

    Ok(())
}

pub fn run_rm(app: &App, query: &str) -> Result<()> {
    let problem = app.find_problem(query)?;
    app.problems
        .delete(problem.id)
        .context("Failed to delete problem")?;
    println!("Deleted \"{}\"", problem.title);
    Ok(())
}

/// Shorten a title to `width` characters, cutting on char boundaries so
/// non-ASCII titles never split a codepoint
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
