//! Contest processing flow.
//!
//! One contest end to end: load → openness check → question → answer →
//! fill → submit → confirm → ledger row. Every exit path appends exactly
//! one row and releases the page.

use std::io::Write as _;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::error_kind;
use crate::infrastructure::PageDriver;
use crate::models::{AnswerMode, LedgerEntry, QuestionKind, Status};
use crate::services::{classify, ArtifactService, ContestState, CreativeService, FactLookup, Ledger};
use crate::utils::{pick_question_line, truncate_text};
use crate::workflow::contest_ctx::ContestCtx;

/// Candidate text blocks around the entry form, closest first.
const QUESTION_SOURCES_JS: &str = r#"(function() {
    const texts = [];
    const ta = document.querySelector('form textarea') || document.querySelector('textarea');
    if (ta) {
        const container = ta.closest('form, section, div');
        if (container) texts.push(container.innerText || '');
    }
    const form = document.querySelector('form');
    if (form) texts.push(form.innerText || '');
    texts.push(document.body ? (document.body.innerText || '') : '');
    return texts;
})()"#;

const CHECKBOX_JS: &str = r#"(function() {
    const boxes = Array.from(document.querySelectorAll("form input[type='checkbox']")).slice(0, 6);
    let ticked = 0;
    for (const box of boxes) {
        if (box.checked || box.getClientRects().length === 0) continue;
        try {
            box.click();
            if (!box.checked) box.checked = true;
            box.dispatchEvent(new Event('change', { bubbles: true }));
            ticked += 1;
        } catch (err) {
            let sibling = box.nextElementSibling;
            while (sibling && sibling.tagName !== 'LABEL') sibling = sibling.nextElementSibling;
            if (sibling) {
                try { sibling.click(); ticked += 1; } catch (err2) {}
            }
        }
    }
    return ticked;
})()"#;

/// Submit triggers in priority order. The click is deferred a beat so the
/// evaluation returns before any navigation it causes.
const SUBMIT_STAGES: [&str; 4] = [
    r#"(function() {
        const needle = 'wyślij zgłoszenie';
        const btn = Array.from(document.querySelectorAll('button'))
            .find(b => (b.textContent || '').toLowerCase().includes(needle) && b.getClientRects().length > 0);
        if (!btn) return false;
        setTimeout(() => btn.click(), 30);
        return true;
    })()"#,
    // any element carrying the text, innermost match wins
    r#"(function() {
        const needle = 'wyślij zgłoszenie';
        const holds = el => (el.textContent || '').toLowerCase().includes(needle);
        const el = Array.from(document.querySelectorAll('*')).find(e =>
            e.getClientRects().length > 0 &&
            holds(e) &&
            !Array.from(e.children).some(holds)
        );
        if (!el) return false;
        setTimeout(() => el.click(), 30);
        return true;
    })()"#,
    r#"(function() {
        const el = Array.from(document.querySelectorAll("input[type='submit']")).find(e => e.getClientRects().length > 0);
        if (!el) return false;
        setTimeout(() => el.click(), 30);
        return true;
    })()"#,
    r#"(function() {
        const el = Array.from(document.querySelectorAll("button[type='submit']")).find(e => e.getClientRects().length > 0);
        if (!el) return false;
        setTimeout(() => el.click(), 30);
        return true;
    })()"#,
];

const TOAST_JS: &str = r#"(function() {
    const div = document.createElement('div');
    div.textContent = '✅ Zgłoszenie wysłane!';
    Object.assign(div.style, {
        position: 'fixed', top: '20px', right: '20px', background: '#16a34a',
        color: '#fff', padding: '10px 16px', borderRadius: '8px',
        boxShadow: '0 4px 12px rgba(0,0,0,0.2)', zIndex: 999999,
        fontFamily: 'system-ui', fontSize: '14px'
    });
    document.body.appendChild(div);
    setTimeout(() => div.remove(), 5000);
    return true;
})()"#;

/// Strategy actually applied, plus the annotated mode label when the
/// caller asked for `auto`.
fn resolve_strategy(mode: AnswerMode, kind: QuestionKind) -> (QuestionKind, Option<String>) {
    match mode {
        AnswerMode::Auto => (kind, Some(format!("auto->{}", kind.label()))),
        AnswerMode::Creative => (QuestionKind::Creative, None),
        AnswerMode::Fact => (QuestionKind::Fact, None),
    }
}

/// What one attempt has produced so far. Logged even when the attempt
/// dies early.
struct Attempt {
    question: String,
    answer: String,
    mode_label: String,
    source: String,
}

impl Attempt {
    fn new(mode: AnswerMode) -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            mode_label: mode.to_string(),
            source: String::new(),
        }
    }
}

/// Processes a single contest.
///
/// - orchestrates the full attempt
/// - owns no page; acquires one per run and always releases it
/// - depends only on services
pub struct ContestFlow {
    creative: CreativeService,
    fact: FactLookup,
    state: ContestState,
    artifacts: ArtifactService,
    ledger: Ledger,
    mode: AnswerMode,
    dry_run: bool,
    save_artifacts: bool,
    require_fill_success: bool,
    navigation_timeout: Duration,
    click_timeout: Duration,
}

impl ContestFlow {
    pub fn new(config: &Config, ledger: Ledger) -> Self {
        Self {
            creative: CreativeService::new(config.style),
            fact: FactLookup::new(config.lookup_timeout),
            state: ContestState::new(),
            artifacts: ArtifactService::new(&config.artifacts_dir),
            ledger,
            mode: config.mode,
            dry_run: config.dry_run,
            save_artifacts: config.save_artifacts,
            require_fill_success: config.require_fill_success,
            navigation_timeout: config.navigation_timeout,
            click_timeout: config.click_timeout,
        }
    }

    /// Process one contest and append its ledger row.
    ///
    /// Per-contest failures come back as an `ERROR:*` status, not an `Err`;
    /// only a failed ledger append propagates.
    pub async fn run(&self, session: &BrowserSession, ctx: &ContestCtx) -> Result<Status> {
        let mut attempt = Attempt::new(self.mode);

        let status = match session.new_page().await {
            Ok(page) => {
                let driver = PageDriver::new(page);
                let outcome = self.process(session, &driver, ctx, &mut attempt).await;
                driver.close().await;
                match outcome {
                    Ok(status) => status,
                    Err(e) => {
                        // error rows keep the mode and source resolved so
                        // far, but never a partial question/answer
                        attempt.question.clear();
                        attempt.answer.clear();
                        Status::Error {
                            kind: error_kind(&e).to_string(),
                            message: format!("{:#}", e),
                        }
                    }
                }
            }
            Err(e) => Status::Error {
                kind: error_kind(&e).to_string(),
                message: format!("{:#}", e),
            },
        };

        self.ledger.append(&LedgerEntry {
            contest_url: ctx.url.clone(),
            question: attempt.question.clone(),
            answer: attempt.answer.clone(),
            mode: attempt.mode_label.clone(),
            status: status.clone(),
            source: attempt.source.clone(),
        })?;
        self.log_outcome(ctx, &status, &attempt);
        Ok(status)
    }

    // ========== pipeline ==========

    async fn process(
        &self,
        session: &BrowserSession,
        driver: &PageDriver,
        ctx: &ContestCtx,
        attempt: &mut Attempt,
    ) -> Result<Status> {
        driver.goto(&ctx.url, self.navigation_timeout).await?;

        if !self.state.is_open(driver).await {
            return Ok(Status::SkippedEnded);
        }

        let question = self.extract_question(driver).await;
        if question.is_empty() {
            warn!("{} ⚠️ no question found on the page", ctx);
        } else {
            info!("{} ❓ {}", ctx, truncate_text(&question, 120));
        }
        attempt.question = question.clone();

        let (strategy, annotated) = resolve_strategy(self.mode, classify(&question));
        if let Some(label) = annotated {
            attempt.mode_label = label;
        }
        info!("{} 🧭 mode: {}", ctx, attempt.mode_label);

        match strategy {
            QuestionKind::Creative => {
                attempt.answer = self.creative.compose(&question);
            }
            QuestionKind::Fact => {
                let (answer, source) = self.fact.lookup(session.browser(), &question).await?;
                attempt.answer = answer;
                attempt.source = source;
            }
        }

        let filled = self.fill_answer(driver, &attempt.answer).await;
        if !filled {
            warn!("{} ⚠️ could not fill the answer box", ctx);
            if self.require_fill_success && !self.dry_run {
                return Ok(Status::NotSent);
            }
        }

        let ticked = self.tick_required_boxes(driver).await;
        if ticked > 0 {
            info!("{} ☑ ticked {} consent boxes", ctx, ticked);
        }

        if self.save_artifacts {
            if let Err(e) = self.artifacts.capture(driver).await {
                warn!("{} ⚠️ artifact capture failed: {}", ctx, e);
            }
        }

        if self.dry_run {
            return Ok(Status::DryFilled);
        }

        if !self.click_submit(driver).await {
            return Ok(Status::NotSent);
        }
        // the deferred click fires and may navigate; give the page a moment
        sleep(Duration::from_millis(1500)).await;

        let confirmed = self.state.confirmed(driver).await;
        self.celebrate(driver).await;
        Ok(if confirmed {
            Status::SentConfirmed
        } else {
            Status::Sent
        })
    }

    // ========== page interactions ==========

    /// First question-looking line near the form, widening to the whole
    /// page. Extraction never fails the attempt.
    async fn extract_question(&self, driver: &PageDriver) -> String {
        match driver.eval_as::<Vec<String>>(QUESTION_SOURCES_JS).await {
            Ok(stages) => stages
                .iter()
                .filter_map(|text| pick_question_line(text))
                .next()
                .unwrap_or_default(),
            Err(e) => {
                debug!("question extraction failed: {}", e);
                String::new()
            }
        }
    }

    async fn fill_answer(&self, driver: &PageDriver, answer: &str) -> bool {
        let answer_json = match serde_json::to_string(answer) {
            Ok(json) => json,
            Err(_) => return false,
        };
        let js = format!(
            r#"(function() {{
                const ta = document.querySelector('form textarea') || document.querySelector('textarea');
                if (!ta) return false;
                ta.focus();
                ta.value = {answer_json};
                ta.dispatchEvent(new Event('input', {{ bubbles: true }}));
                ta.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#
        );
        match driver.eval_as::<bool>(js).await {
            Ok(filled) => filled,
            Err(e) => {
                debug!("answer fill failed: {}", e);
                false
            }
        }
    }

    /// Tick up to six visible, unchecked consent boxes in the form.
    async fn tick_required_boxes(&self, driver: &PageDriver) -> u32 {
        match driver.eval_as::<u32>(CHECKBOX_JS).await {
            Ok(ticked) => ticked,
            Err(e) => {
                debug!("checkbox ticking failed: {}", e);
                0
            }
        }
    }

    /// Try each submit trigger in order until one reports a click.
    async fn click_submit(&self, driver: &PageDriver) -> bool {
        for js in SUBMIT_STAGES {
            match tokio::time::timeout(self.click_timeout, driver.eval_as::<bool>(js)).await {
                Ok(Ok(true)) => return true,
                Ok(Ok(false)) => continue,
                Ok(Err(e)) => {
                    debug!("submit stage failed: {}", e);
                    continue;
                }
                Err(_) => {
                    debug!("submit stage timed out");
                    continue;
                }
            }
        }
        false
    }

    /// On-page toast plus a terminal bell. Pure feedback, never fails.
    async fn celebrate(&self, driver: &PageDriver) {
        if let Err(e) = driver.eval(TOAST_JS).await {
            debug!("toast injection failed: {}", e);
        }
        print!("\x07");
        let _ = std::io::stdout().flush();
    }

    // ========== log helpers ==========

    fn log_outcome(&self, ctx: &ContestCtx, status: &Status, attempt: &Attempt) {
        match status {
            Status::SkippedEnded => info!("{} ⏭ {}", ctx, status),
            Status::Error { .. } => error!("{} ❌ {}", ctx, status),
            Status::DryFilled => info!("{} 🧪 {}", ctx, status),
            _ => info!("{} 📤 {}", ctx, status),
        }
        if !attempt.question.is_empty() {
            info!("  Q: {}", truncate_text(&attempt.question, 120));
            info!("  A: {}", truncate_text(&attempt.answer, 160));
        }
    }
}
