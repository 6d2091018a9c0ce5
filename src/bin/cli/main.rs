mod app;
mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "grind-cli", about = "Coding practice tracker CLI", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Log and manage solved problems
    #[command(subcommand)]
    Problem(ProblemCommand),

    /// Spaced-repetition review cycle
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Practice todos
    #[command(subcommand)]
    Todo(TodoCommand),

    /// Contest tracking
    #[command(subcommand)]
    Contest(ContestCommand),

    /// Show aggregate practice statistics
    Stats,
}

#[derive(Subcommand)]
enum ProblemCommand {
    /// Log a solved problem
    Add {
        /// Problem title
        title: String,
        /// Platform: leetcode (lc), codeforces (cf), atcoder (ac)
        #[arg(long, default_value = "leetcode")]
        platform: String,
        /// Difficulty: easy, medium, hard
        #[arg(long, conflicts_with = "cf_rating")]
        difficulty: Option<String>,
        /// Codeforces rating, normalized to a difficulty bucket
        #[arg(long)]
        cf_rating: Option<u32>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Problem URL
        #[arg(long)]
        url: Option<String>,
    },

    /// List logged problems
    List {
        /// Filter by platform
        #[arg(long)]
        platform: Option<String>,
    },

    /// Show a problem, including its review history
    Show {
        /// Problem ID, ID prefix, or title prefix
        problem: String,
    },

    /// Delete a problem (and its review state with it)
    Rm {
        /// Problem ID, ID prefix, or title prefix
        problem: String,
    },
}

#[derive(Subcommand)]
enum ReviewCommand {
    /// List problems due for review
    Due,

    /// Submit a review outcome (quality 1-5)
    Submit {
        /// Problem ID, ID prefix, or title prefix
        problem: String,
        /// Quality rating: 1 (failed) to 5 (perfect)
        quality: i32,
        /// Minutes spent
        #[arg(long)]
        minutes: Option<u32>,
        /// Review notes
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated tags for this review
        #[arg(long)]
        tags: Option<String>,
    },

    /// Show the interval each quality rating would produce
    Preview {
        /// Problem ID, ID prefix, or title prefix
        problem: String,
    },
}

#[derive(Subcommand)]
enum TodoCommand {
    /// Add a practice todo
    Add {
        /// Todo title
        title: String,
        /// Priority: low, medium, high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Extra notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List todos
    List {
        /// Show only pending todos
        #[arg(long)]
        pending: bool,
    },

    /// Mark a todo done
    Done {
        /// Todo ID or title prefix
        todo: String,
    },

    /// Delete a todo
    Rm {
        /// Todo ID or title prefix
        todo: String,
    },
}

#[derive(Subcommand)]
enum ContestCommand {
    /// Track a contest
    Add {
        /// Contest name
        name: String,
        /// Platform: leetcode (lc), codeforces (cf), atcoder (ac)
        #[arg(long)]
        platform: String,
        /// Start time, RFC 3339 or "YYYY-MM-DD HH:MM" local time
        #[arg(long)]
        start: String,
        /// Duration in minutes
        #[arg(long, default_value = "120")]
        minutes: u32,
        /// Contest URL
        #[arg(long)]
        url: Option<String>,
    },

    /// List all tracked contests
    List,

    /// List contests that have not started yet
    Upcoming,

    /// Record a result for a contest
    Result {
        /// Contest ID or name prefix
        contest: String,
        /// Final rank
        #[arg(long)]
        rank: Option<u32>,
        /// Rating change
        #[arg(long)]
        delta: Option<i32>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Problem(subcmd) => match subcmd {
            ProblemCommand::Add {
                title,
                platform,
                difficulty,
                cf_rating,
                tags,
                url,
            } => commands::problem::run_add(
                &app,
                &title,
                &platform,
                difficulty.as_deref(),
                cf_rating,
                tags.as_deref(),
                url,
                &cli.format,
            )?,
            ProblemCommand::List { platform } => {
                commands::problem::run_list(&app, platform.as_deref(), &cli.format, use_color)?
            }
            ProblemCommand::Show { problem } => {
                commands::problem::run_show(&app, &problem, &cli.format)?
            }
            ProblemCommand::Rm { problem } => commands::problem::run_rm(&app, &problem)?,
        },
        Command::Review(subcmd) => match subcmd {
            ReviewCommand::Due => commands::review::run_due(&app, &cli.format, use_color)?,
            ReviewCommand::Submit {
                problem,
                quality,
                minutes,
                notes,
                tags,
            } => commands::review::run_submit(
                &app,
                &problem,
                quality,
                minutes,
                notes,
                tags.as_deref(),
                &cli.format,
            )?,
            ReviewCommand::Preview { problem } => {
                commands::review::run_preview(&app, &problem, &cli.format)?
            }
        },
        Command::Todo(subcmd) => match subcmd {
            TodoCommand::Add {
                title,
                priority,
                tags,
                notes,
            } => commands::todo::run_add(&app, &title, &priority, tags.as_deref(), notes, &cli.format)?,
            TodoCommand::List { pending } => {
                commands::todo::run_list(&app, pending, &cli.format, use_color)?
            }
            TodoCommand::Done { todo } => commands::todo::run_done(&app, &todo, &cli.format)?,
            TodoCommand::Rm { todo } => commands::todo::run_rm(&app, &todo)?,
        },
        Command::Contest(subcmd) => match subcmd {
            ContestCommand::Add {
                name,
                platform,
                start,
                minutes,
                url,
            } => commands::contest::run_add(&app, &name, &platform, &start, minutes, url, &cli.format)?,
            ContestCommand::List => commands::contest::run_list(&app, &cli.format, use_color)?,
            ContestCommand::Upcoming => {
                commands::contest::run_upcoming(&app, &cli.format, use_color)?
            }
            ContestCommand::Result {
                contest,
                rank,
                delta,
            } => commands::contest::run_result(&app, &contest, rank, delta, &cli.format)?,
        },
        Command::Stats => commands::stats::run(&app, &cli.format)?,
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
