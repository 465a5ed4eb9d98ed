use clap::Parser;

use crate::models::{AnswerMode, AnswerStyle};

/// Command-line surface of the contest agent.
#[derive(Debug, Parser)]
#[command(name = "filmweb_agent")]
#[command(about = "Automated contest entries on filmweb.pl", long_about = None)]
pub struct Args {
    /// Scan hub pages for contests (pass `--scan false` to process --url only)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub scan: bool,

    /// Stop after this many non-ended contests in one run
    #[arg(long, default_value_t = 3)]
    pub max_contests: usize,

    /// Daily cap on counted submissions
    #[arg(long, default_value_t = 3)]
    pub max_daily: usize,

    /// Contest URL for single mode
    #[arg(long)]
    pub url: Option<String>,

    /// Run the browser without a visible window
    #[arg(long)]
    pub headless: bool,

    /// Answer mode applied to every contest
    #[arg(long, value_enum, default_value_t = AnswerMode::Auto)]
    pub mode: AnswerMode,

    /// Fill forms but never submit
    #[arg(long)]
    pub dry_run: bool,

    /// Run the login flow before processing (single mode)
    #[arg(long)]
    pub force_login: bool,

    /// Length of composed creative answers
    #[arg(long, value_enum, default_value_t = AnswerStyle::Medium)]
    pub style: AnswerStyle,

    /// Save a screenshot and HTML snapshot of each filled form
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub save_artifacts: bool,

    /// Treat a failed answer fill as a failed attempt instead of submitting anyway
    #[arg(long)]
    pub require_fill_success: bool,
}
