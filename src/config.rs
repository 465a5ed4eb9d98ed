use std::time::Duration;

use crate::cli::Args;
use crate::models::{AnswerMode, AnswerStyle};

/// Runtime configuration for the contest agent.
#[derive(Clone, Debug)]
pub struct Config {
    /// Scan hub pages for contest links (otherwise process a single URL).
    pub scan: bool,
    /// Stop after this many non-ended contests in one run.
    pub max_contests: usize,
    /// Daily cap on counted submissions.
    pub max_daily: usize,
    /// Contest URL for single mode.
    pub url: Option<String>,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Answer mode for every contest in this run.
    pub mode: AnswerMode,
    /// Fill forms but never submit.
    pub dry_run: bool,
    /// Run the login flow before processing (single mode only).
    pub force_login: bool,
    /// Length of composed creative answers.
    pub style: AnswerStyle,
    /// Capture a screenshot and HTML snapshot of each filled form.
    pub save_artifacts: bool,
    /// Treat a failed answer fill as a failed attempt instead of submitting anyway.
    pub require_fill_success: bool,
    /// Account e-mail matched against the Google account chooser.
    pub login_email: String,
    /// CSV ledger path.
    pub ledger_path: String,
    /// Persistent browser profile directory.
    pub user_data_dir: String,
    /// Directory for page snapshots.
    pub artifacts_dir: String,
    /// Hub pages scanned for contest links.
    pub hub_urls: Vec<String>,
    /// Links must start with this prefix to count as contest entries.
    pub contest_prefix: String,
    /// Base for resolving root-relative hrefs.
    pub site_root: String,
    /// Hours east of UTC for the "today" used by the daily quota.
    pub utc_offset_hours: i32,
    /// Per-page navigation timeout.
    pub navigation_timeout: Duration,
    /// Hub page navigation timeout during discovery.
    pub discovery_timeout: Duration,
    /// Timeout for a single submit click attempt.
    pub click_timeout: Duration,
    /// Navigation timeout for the web fact lookup.
    pub lookup_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: true,
            max_contests: 3,
            max_daily: 3,
            url: None,
            headless: false,
            mode: AnswerMode::Auto,
            dry_run: false,
            force_login: false,
            style: AnswerStyle::Medium,
            save_artifacts: true,
            require_fill_success: false,
            login_email: String::new(),
            ledger_path: "filmweb_agent_log.csv".to_string(),
            user_data_dir: "filmweb_user_data".to_string(),
            artifacts_dir: "artifacts".to_string(),
            hub_urls: vec![
                "https://www.filmweb.pl/contests".to_string(),
                "https://www.filmweb.pl/contest".to_string(),
                "https://www.filmweb.pl/".to_string(),
            ],
            contest_prefix: "https://www.filmweb.pl/contest/".to_string(),
            site_root: "https://www.filmweb.pl".to_string(),
            utc_offset_hours: 1,
            navigation_timeout: Duration::from_secs(30),
            discovery_timeout: Duration::from_secs(25),
            click_timeout: Duration::from_secs(3),
            lookup_timeout: Duration::from_secs(12),
        }
    }
}

impl Config {
    /// Build the runtime configuration from parsed CLI arguments,
    /// with environment overrides for the file-system knobs.
    pub fn from_args(args: Args) -> Self {
        let default = Self::default();
        Self {
            scan: args.scan,
            max_contests: args.max_contests,
            max_daily: args.max_daily,
            url: args.url,
            headless: args.headless,
            mode: args.mode,
            dry_run: args.dry_run,
            force_login: args.force_login,
            style: args.style,
            save_artifacts: args.save_artifacts,
            require_fill_success: args.require_fill_success,
            login_email: std::env::var("FILMWEB_EMAIL").unwrap_or(default.login_email),
            ledger_path: std::env::var("FILMWEB_LEDGER").unwrap_or(default.ledger_path),
            user_data_dir: std::env::var("FILMWEB_USER_DATA").unwrap_or(default.user_data_dir),
            artifacts_dir: std::env::var("FILMWEB_ARTIFACTS").unwrap_or(default.artifacts_dir),
            hub_urls: default.hub_urls,
            contest_prefix: default.contest_prefix,
            site_root: default.site_root,
            utc_offset_hours: default.utc_offset_hours,
            navigation_timeout: default.navigation_timeout,
            discovery_timeout: default.discovery_timeout,
            click_timeout: default.click_timeout,
            lookup_timeout: default.lookup_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_cli_surface() {
        let config = Config::default();
        assert!(config.scan);
        assert_eq!(config.max_contests, 3);
        assert_eq!(config.max_daily, 3);
        assert!(!config.headless);
        assert_eq!(config.mode, AnswerMode::Auto);
        assert!(!config.dry_run);
        assert_eq!(config.style, AnswerStyle::Medium);
        assert!(config.save_artifacts);
        assert!(!config.require_fill_success);
        assert_eq!(config.hub_urls.len(), 3);
        assert!(config
            .hub_urls
            .iter()
            .all(|hub| hub.starts_with(&config.site_root)));
    }
}
