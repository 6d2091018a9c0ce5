use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use grind_lib::contests::{Contest, ContestResult};
use grind_lib::problems::Platform;

use crate::app::{short_id, App};
use crate::OutputFormat;

/// Parse a start time: RFC 3339, or "YYYY-MM-DD HH:MM" in local time
fn parse_start(start: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(start) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M") {
        if let Some(local) = Local.from_local_datetime(&naive).single() {
            return Ok(local.with_timezone(&Utc));
        }
    }
    bail!("Could not parse start time '{}' (expected RFC 3339 or \"YYYY-MM-DD HH:MM\")", start)
}

pub fn run_add(
    app: &App,
    name: &str,
    platform: &str,
    start: &str,
    minutes: u32,
    url: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let platform: Platform = platform.parse().map_err(anyhow::Error::msg)?;
    let start_time = parse_start(start)?;

    let mut contest = Contest::new(name.to_string(), platform, start_time, minutes);
    if let Some(url) = url {
        contest = contest.with_url(url);
    }

    let contest = app.contests.add(contest).context("Failed to save contest")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": contest.id.to_string(),
                "name": contest.name,
                "platform": contest.platform.as_str(),
                "startTime": contest.start_time.to_rfc3339(),
                "durationMinutes": contest.duration_minutes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Tracking \"{}\" on {} at {}",
                contest.name,
                contest.platform.as_str(),
                contest
                    .start_time
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
            );
            println!("  ID: {}", contest.id);
        }
    }

    Ok(())
}

fn print_contests(contests: &[Contest], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = contests
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "id": c.id.to_string(),
                        "name": c.name,
                        "platform": c.platform.as_str(),
                        "startTime": c.start_time.to_rfc3339(),
                        "durationMinutes": c.duration_minutes,
                        "participated": c.participated,
                        "rank": c.rank,
                        "ratingChange": c.rating_change,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for c in contests {
                let when = c
                    .start_time
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M");
                let result = if c.participated {
                    let rank = c
                        .rank
                        .map(|r| format!("rank {}", r))
                        .unwrap_or_else(|| "participated".to_string());
                    let delta = c
                        .rating_change
                        .map(|d| format!(" ({:+})", d))
                        .unwrap_or_default();
                    format!("  {}{}", rank, delta)
                } else {
                    String::new()
                };
                println!(
                    "  {}  {}  {} [{}]{}",
                    short_id(c.id),
                    when,
                    c.name,
                    c.platform.as_str(),
                    result
                );
            }
        }
    }
    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let contests = app.contests.list().context("Failed to list contests")?;
    if contests.is_empty() {
        if matches!(format, OutputFormat::Plain) {
            println!("No contests tracked.");
            return Ok(());
        }
    }
    print_contests(&contests, format)
}

pub fn run_upcoming(app: &App, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let contests = app
        .contests
        .upcoming(Utc::now())
        .context("Failed to list upcoming contests")?;
    if contests.is_empty() {
        if matches!(format, OutputFormat::Plain) {
            println!("No upcoming contests.");
            return Ok(());
        }
    }
    print_contests(&contests, format)
}

pub fn run_result(
    app: &App,
    query: &str,
    rank: Option<u32>,
    delta: Option<i32>,
    format: &OutputFormat,
) -> Result<()> {
    let contest = app.find_contest(query)?;
    let updated = app
        .contests
        .record_result(
            contest.id,
            &ContestResult {
                rank,
                rating_change: delta,
            },
        )
        .context("Failed to record result")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": updated.id.to_string(),
                "name": updated.name,
                "rank": updated.rank,
                "ratingChange": updated.rating_change,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Recorded result for \"{}\"", updated.name);
            if let Some(rank) = updated.rank {
                println!("  Rank: {}", rank);
            }
            if let Some(delta) = updated.rating_change {
                println!("  Rating change: {:+}", delta);
            }
        }
    }

    Ok(())
}
