//! Run orchestration.
//!
//! Owns the browser session and the ledger, enforces the daily quota and
//! the per-run contest cap, and delegates each contest to the flow.

use std::future::Future;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::browser::{login_via_google, BrowserSession};
use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::Status;
use crate::orchestrator::scan;
use crate::services::Ledger;
use crate::workflow::{ContestCtx, ContestFlow};

/// Application entry object.
pub struct Agent {
    config: Config,
    session: BrowserSession,
    ledger: Ledger,
}

impl Agent {
    /// Prepare the ledger and launch the browser.
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let ledger = Ledger::new(&config.ledger_path, config.utc_offset_hours);
        ledger.ensure_initialized()?;
        let session = BrowserSession::launch(&config).await?;

        Ok(Self {
            config,
            session,
            ledger,
        })
    }

    /// Run to completion and close the browser on every path.
    pub async fn run(self) -> Result<()> {
        let Self {
            config,
            session,
            ledger,
        } = self;
        let result = run_inner(&config, &session, &ledger).await;
        session.close().await;
        result
    }
}

async fn run_inner(config: &Config, session: &BrowserSession, ledger: &Ledger) -> Result<()> {
    if !quota_allows_start(ledger, config.max_daily) {
        return Ok(());
    }

    let flow = ContestFlow::new(config, ledger.clone());
    if config.scan {
        run_scan(config, session, ledger, &flow).await
    } else {
        run_single(config, session, &flow).await
    }
}

/// Discovery-driven mode: walk the candidates under quota and count caps.
async fn run_scan(
    config: &Config,
    session: &BrowserSession,
    ledger: &Ledger,
    flow: &ContestFlow,
) -> Result<()> {
    let candidates = scan::discover_contests(session, config).await?;
    if candidates.is_empty() {
        warn!("⚠️ no contest links found on the hubs");
        return Ok(());
    }
    log_candidates(&candidates);

    let stats = process_candidates(
        &candidates,
        ledger,
        config.max_daily,
        config.max_contests,
        |url, ordinal| {
            let ctx = ContestCtx::new(url, ordinal);
            async move {
                info!("{}", "─".repeat(60));
                info!(">>> processing {}", ctx);
                flow.run(session, &ctx).await
            }
        },
    )
    .await?;
    log_final_stats(&stats);
    Ok(())
}

/// Walk the candidate list, gating each step on the daily quota and
/// stopping once enough non-ended contests were handled.
async fn process_candidates<F, Fut>(
    candidates: &[String],
    ledger: &Ledger,
    max_daily: usize,
    max_contests: usize,
    mut step: F,
) -> Result<RunStats>
where
    F: FnMut(String, usize) -> Fut,
    Fut: Future<Output = Result<Status>>,
{
    let mut stats = RunStats::default();
    let mut active = 0usize;
    for (i, url) in candidates.iter().enumerate() {
        // sent statuses raise the count mid-run, so re-check every time
        let sent_today = ledger.count_today_counted();
        if sent_today >= max_daily {
            info!(
                "📅 daily limit reached ({}/{}), stopping the scan",
                sent_today, max_daily
            );
            break;
        }

        let status = step(url.clone(), i + 1).await?;
        stats.record(&status);

        if !status.is_skipped_ended() {
            active += 1;
            if active >= max_contests {
                info!("🎯 processed {} active contests, stopping", active);
                break;
            }
        }
    }
    Ok(stats)
}

/// False once today's counted sends meet the daily cap.
fn quota_allows_start(ledger: &Ledger, max_daily: usize) -> bool {
    let sent_today = ledger.count_today_counted();
    if sent_today >= max_daily {
        info!(
            "📅 daily limit reached ({}/{}), nothing to do",
            sent_today, max_daily
        );
        return false;
    }
    true
}

/// Single-URL mode, with the optional login flow first.
async fn run_single(config: &Config, session: &BrowserSession, flow: &ContestFlow) -> Result<()> {
    let url = match &config.url {
        Some(url) => url.clone(),
        None => {
            error!("❌ single mode needs --url");
            return Ok(());
        }
    };

    if config.force_login {
        match session.new_page().await {
            Ok(page) => {
                let driver = PageDriver::new(page);
                if let Err(e) = driver.goto(&url, config.navigation_timeout).await {
                    warn!("⚠️ could not open the contest page before login: {}", e);
                }
                login_via_google(session, &driver, &config.login_email).await;
                driver.close().await;
            }
            Err(e) => warn!("⚠️ login page creation failed: {}", e),
        }
    }

    let ctx = ContestCtx::new(url, 1);
    flow.run(session, &ctx).await?;
    Ok(())
}

/// Outcome tally for one run.
#[derive(Debug, Default)]
struct RunStats {
    sent: usize,
    dry: usize,
    skipped: usize,
    not_sent: usize,
    errors: usize,
}

impl RunStats {
    fn record(&mut self, status: &Status) {
        match status {
            Status::Sent | Status::SentConfirmed => self.sent += 1,
            Status::DryFilled => self.dry += 1,
            Status::SkippedEnded => self.skipped += 1,
            Status::NotSent => self.not_sent += 1,
            Status::Error { .. } => self.errors += 1,
        }
    }
}

// ========== log helpers ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 filmweb contest agent");
    info!(
        "   mode: {} | style: {} | dry run: {}",
        config.mode, config.style, config.dry_run
    );
    info!(
        "   daily limit: {} | contests per run: {}",
        config.max_daily, config.max_contests
    );
    info!("{}", "=".repeat(60));
}

fn log_candidates(candidates: &[String]) {
    info!("✓ found {} contest candidates:", candidates.len());
    for (i, url) in candidates.iter().enumerate() {
        info!("  {}. {}", i + 1, url);
    }
}

fn log_final_stats(stats: &RunStats) {
    info!("{}", "=".repeat(60));
    info!("📊 run complete");
    info!("  📤 sent: {}", stats.sent);
    info!("  🧪 dry filled: {}", stats.dry);
    info!("  ⏭ skipped (ended): {}", stats.skipped);
    info!("  🚫 not sent: {}", stats.not_sent);
    info!("  ❌ errors: {}", stats.errors);
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LedgerEntry;

    fn seeded_ledger(dir: &tempfile::TempDir, sent_rows: usize) -> Ledger {
        let ledger = Ledger::new(dir.path().join("log.csv"), 1);
        ledger.ensure_initialized().expect("init");
        for i in 0..sent_rows {
            ledger.append(&sent_entry(&format!("Seed{}", i))).expect("append");
        }
        ledger
    }

    fn sent_entry(slug: &str) -> LedgerEntry {
        LedgerEntry {
            contest_url: format!("https://www.filmweb.pl/contest/{}", slug),
            question: "W którym roku powstał film?".to_string(),
            answer: "1994".to_string(),
            mode: "auto->fact".to_string(),
            status: Status::Sent,
            source: String::new(),
        }
    }

    fn candidates(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("https://www.filmweb.pl/contest/Quiz{}", i))
            .collect()
    }

    #[test]
    fn stats_bucket_every_status() {
        let mut stats = RunStats::default();
        stats.record(&Status::Sent);
        stats.record(&Status::SentConfirmed);
        stats.record(&Status::DryFilled);
        stats.record(&Status::SkippedEnded);
        stats.record(&Status::NotSent);
        stats.record(&Status::Error {
            kind: "Navigation".to_string(),
            message: "timed out".to_string(),
        });

        assert_eq!(stats.sent, 2);
        assert_eq!(stats.dry, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.not_sent, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn the_start_gate_closes_at_the_daily_cap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = seeded_ledger(&dir, 2);

        assert!(!quota_allows_start(&ledger, 2));
        assert!(!quota_allows_start(&ledger, 1));
        assert!(quota_allows_start(&ledger, 3));
    }

    #[tokio::test]
    async fn a_spent_quota_processes_no_candidates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = seeded_ledger(&dir, 3);
        let mut processed = 0usize;

        let stats = process_candidates(&candidates(4), &ledger, 3, 10, |_url, _ordinal| {
            processed += 1;
            async { Ok(Status::Sent) }
        })
        .await
        .expect("candidate loop");

        assert_eq!(processed, 0);
        assert_eq!(stats.sent, 0);
    }

    #[tokio::test]
    async fn mid_run_sends_stop_the_scan_at_the_cap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = seeded_ledger(&dir, 1);
        let worker = ledger.clone();
        let mut processed = 0usize;

        let stats = process_candidates(&candidates(5), &ledger, 2, 10, |url, _ordinal| {
            processed += 1;
            let worker = worker.clone();
            async move {
                let mut entry = sent_entry("Live");
                entry.contest_url = url;
                worker.append(&entry).expect("append");
                Ok(Status::Sent)
            }
        })
        .await
        .expect("candidate loop");

        // one seeded send plus one from the loop reaches the cap of two
        assert_eq!(processed, 1);
        assert_eq!(stats.sent, 1);
    }

    #[tokio::test]
    async fn skipped_contests_do_not_fill_the_active_cap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = seeded_ledger(&dir, 0);
        let mut calls = 0usize;

        let stats = process_candidates(&candidates(4), &ledger, 10, 2, |_url, _ordinal| {
            calls += 1;
            let status = if calls <= 2 {
                Status::SkippedEnded
            } else {
                Status::DryFilled
            };
            async move { Ok(status) }
        })
        .await
        .expect("candidate loop");

        assert_eq!(calls, 4);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.dry, 2);
    }
}
