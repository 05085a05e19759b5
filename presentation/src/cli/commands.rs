//! CLI command definitions

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for pitch-coach
#[derive(Parser, Debug)]
#[command(name = "pitch-coach")]
#[command(author, version, about = "Communication coach - scored feedback on your pitch")]
#[command(long_about = r#"
Pitch Coach scores a practice pitch and suggests an improved version, or
generates a practice scenario for your role.

Requests go to the primary provider first. Retryable failures are sent to
the fallback provider, then the primary is retried with exponential backoff.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./coach.toml        Project-level config
3. ~/.config/pitch-coach/config.toml   Global config

Credentials come from ANTHROPIC_API_KEY and GEMINI_API_KEY (or GOOGLE_AI_API_KEY).
AI_PROVIDER=anthropic|gemini selects the primary provider.

Example:
  pitch-coach topic "Product manager"
  pitch-coach feedback --topic "Q3 roadmap" --goal "Get buy-in" \
      --point "Customer churn" --point "Pricing" --pitch "We lost 8% of customers..."
  pitch-coach history --min-score 7
  pitch-coach progress
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// User whose sessions are recorded and shown
    #[arg(long, value_name = "ID", default_value = "local", global = true)]
    pub user: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a practice pitch and get an improved version
    Feedback(FeedbackArgs),

    /// Generate a practice scenario for a role
    Topic {
        /// Professional role, e.g. "Software engineer"
        role: String,
    },

    /// List past sessions, or show one session in full
    History(HistoryArgs),

    /// Show totals, streak, trend and achievements
    Progress,
}

#[derive(Args, Debug, Clone)]
pub struct FeedbackArgs {
    /// What the pitch is about
    #[arg(long)]
    pub topic: String,

    /// What the pitch should achieve
    #[arg(long)]
    pub goal: String,

    /// Main point to cover (can be specified multiple times)
    #[arg(short = 'p', long = "point", value_name = "POINT", required = true)]
    pub main_points: Vec<String>,

    /// The pitch text itself
    #[arg(long)]
    pub pitch: String,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Show this session instead of a listing
    pub id: Option<String>,

    /// Page number (starting at 1)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Sessions per page (at most 50)
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Only sessions on or after this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Only sessions on or before this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Lowest score to include
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<u8>,

    /// Highest score to include
    #[arg(long, value_name = "SCORE")]
    pub max_score: Option<u8>,
}
