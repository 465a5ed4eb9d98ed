//! Web fact lookup.
//!
//! Answers fact questions with a quick Bing search in a throwaway tab:
//! answer panel first, then the first organic result. Works without any
//! API key.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::infrastructure::PageDriver;
use crate::utils::{cap_chars, encode_query, normalize_ws};

const FALLBACK_ANSWER: &str = "Brak pewnej odpowiedzi — proszę o doprecyzowanie.";

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(1[89]\d{2}|20\d{2}|21\d{2})\b").expect("hardcoded pattern compiles")
});
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,4}\b").expect("hardcoded pattern compiles"));

/// One organic search result.
#[derive(Debug, Deserialize)]
struct OrganicResult {
    text: String,
    href: Option<String>,
}

/// Looks up fact answers on the web.
pub struct FactLookup {
    timeout: Duration,
}

impl FactLookup {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Answer a fact question, returning `(answer, source)`.
    ///
    /// Opens its own tab and always closes it. Navigation failures
    /// propagate; a page that yields nothing usable produces the fixed
    /// fallback answer with an empty source.
    pub async fn lookup(&self, browser: &Browser, query: &str) -> Result<(String, String)> {
        let page = browser
            .new_page("about:blank")
            .await
            .context("opening lookup page")?;
        let driver = PageDriver::new(page);
        let result = self.lookup_on(&driver, query).await;
        driver.close().await;
        result
    }

    async fn lookup_on(&self, driver: &PageDriver, query: &str) -> Result<(String, String)> {
        let source = format!("https://www.bing.com/search?q={}", encode_query(query));
        driver.goto(&source, self.timeout).await?;
        tokio::time::sleep(Duration::from_millis(800)).await;

        if let Some(text) = self.answer_panel_text(driver).await {
            if let Some(answer) = pick_fact(&normalize_ws(&text)) {
                return Ok((answer, source));
            }
        }

        if let Some(item) = self.first_organic_result(driver).await {
            let text = normalize_ws(&item.text);
            let href = item
                .href
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| source.clone());
            if let Some(year) = YEAR_RE.find(&text) {
                return Ok((year.as_str().to_string(), href));
            }
            if text.chars().count() > 5 {
                return Ok((cap_chars(&text, 220), href));
            }
        }

        Ok((FALLBACK_ANSWER.to_string(), String::new()))
    }

    /// Text of the instant-answer panel, when the page has one.
    async fn answer_panel_text(&self, driver: &PageDriver) -> Option<String> {
        probe_or_none(
            driver
                .eval_as::<Option<String>>(
                    r#"(function() {
                        const panel = document.querySelector('#b_focus, .b_entityTP, .b_focusTextLarge, .b_vList');
                        return panel ? (panel.innerText || '') : null;
                    })()"#,
                )
                .await,
            "answer panel",
        )
    }

    /// First organic result with its primary link.
    async fn first_organic_result(&self, driver: &PageDriver) -> Option<OrganicResult> {
        probe_or_none(
            driver
                .eval_as::<Option<OrganicResult>>(
                    r#"(function() {
                        const item = document.querySelector('li.b_algo');
                        if (!item) return null;
                        const link = item.querySelector('a');
                        return { text: item.innerText || '', href: link ? link.href : null };
                    })()"#,
                )
                .await,
            "organic result",
        )
    }
}

/// A failed probe reads as "nothing found"; extraction falls through to
/// the next stage instead of ending the lookup.
fn probe_or_none<T>(result: Result<Option<T>>, probe: &str) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(e) => {
            debug!("{} probe failed: {}", probe, e);
            None
        }
    }
}

/// A year if the text names one, then any short number, then the capped
/// text itself.
fn pick_fact(text: &str) -> Option<String> {
    if let Some(year) = YEAR_RE.find(text) {
        return Some(year.as_str().to_string());
    }
    if let Some(number) = NUMBER_RE.find(text) {
        return Some(number.as_str().to_string());
    }
    let capped = cap_chars(text, 220);
    if capped.is_empty() {
        None
    } else {
        Some(capped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_win_over_other_numbers() {
        assert_eq!(
            pick_fact("Serial ma 3 sezony, premiera w 1994 roku").as_deref(),
            Some("1994")
        );
        assert_eq!(pick_fact("Premiera: 2099").as_deref(), Some("2099"));
    }

    #[test]
    fn short_numbers_back_up_missing_years() {
        assert_eq!(pick_fact("Serial ma 8 sezonów").as_deref(), Some("8"));
        // outside the year window, still a usable number
        assert_eq!(pick_fact("Akcja toczy się w roku 1799").as_deref(), Some("1799"));
    }

    #[test]
    fn plain_text_is_capped_not_dropped() {
        let text = "x".repeat(300);
        let picked = pick_fact(&text).unwrap();
        assert_eq!(picked.chars().count(), 220);
        assert_eq!(pick_fact(""), None);
    }

    #[test]
    fn failed_probes_read_as_absence() {
        let failed: Result<Option<String>> =
            Err(anyhow::anyhow!("Execution context was destroyed"));
        assert_eq!(probe_or_none(failed, "answer panel"), None);

        let found: Result<Option<String>> = Ok(Some("premiera w 1994".to_string()));
        assert_eq!(
            probe_or_none(found, "answer panel").as_deref(),
            Some("premiera w 1994")
        );

        let absent: Result<Option<String>> = Ok(None);
        assert_eq!(probe_or_none(absent, "organic result"), None);
    }
}
