//! Contest page probes.
//!
//! Decides whether a contest still accepts entries and whether a page
//! shows a submission confirmation. Probes are deliberately asymmetric:
//! a failed text read leaves the contest open, a failed submit-control
//! probe closes it.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::infrastructure::PageDriver;
use crate::utils::normalize_ws;

static ENDED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bkonkurs\s+zakończony\b",
        r"(?i)\bzakończony\b",
        r"(?i)\bzgłoszenia\s+zakończone\b",
        r"(?i)\bdziękujemy\s+za\s+udział\b",
        r"(?i)\bnie\s+przyjmujemy\s+zgłoszeń\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hardcoded pattern compiles"))
    .collect()
});

/// Lowercase markers of an accepted submission.
const CONFIRM_MARKERS: &[&str] = &[
    "dziękujemy",
    "twoje zgłoszenie zostało",
    "zgłoszenie przyjęte",
    "wysłano zgłoszenie",
    "thank you",
];

const SUBMIT_CONTROL_JS: &str = r#"(function() {
    const needle = 'wyślij zgłoszenie';
    const all = Array.from(document.querySelectorAll("button, input[type='submit']"));
    const control = all.find(el =>
        el.matches("input[type='submit']") ||
        el.matches("button[type='submit']") ||
        (el.tagName === 'BUTTON' && (el.textContent || '').toLowerCase().includes(needle))
    );
    if (!control) return false;
    if (control.hasAttribute('disabled')) return false;
    return control.getClientRects().length > 0;
})()"#;

/// Probes the state of a contest page.
pub struct ContestState;

impl ContestState {
    pub fn new() -> Self {
        Self
    }

    /// Whether the contest still accepts entries.
    pub async fn is_open(&self, driver: &PageDriver) -> bool {
        match driver.body_text().await {
            Ok(text) => {
                if text_says_ended(&text) {
                    return false;
                }
            }
            Err(e) => {
                tracing::warn!("⚠️ body text probe failed: {}", e);
            }
        }
        match self.submit_control_usable(driver).await {
            Ok(usable) => usable,
            Err(e) => {
                tracing::debug!("submit control probe failed: {}", e);
                false
            }
        }
    }

    /// Whether the page shows a submission confirmation.
    pub async fn confirmed(&self, driver: &PageDriver) -> bool {
        match driver.body_text().await {
            Ok(text) => text_confirms_submission(&text),
            Err(_) => false,
        }
    }

    /// The submit control must exist, be visible and not carry a disabled
    /// attribute.
    async fn submit_control_usable(&self, driver: &PageDriver) -> Result<bool> {
        driver.eval_as::<bool>(SUBMIT_CONTROL_JS).await
    }
}

impl Default for ContestState {
    fn default() -> Self {
        Self::new()
    }
}

fn text_says_ended(text: &str) -> bool {
    ENDED_PATTERNS.iter().any(|p| p.is_match(text))
}

fn text_confirms_submission(text: &str) -> bool {
    // markers are plain substrings, so line breaks inside a phrase have to
    // be collapsed before the scan
    let lowered = normalize_ws(text).to_lowercase();
    CONFIRM_MARKERS.iter().any(|m| lowered.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ended_wording_closes_the_contest() {
        assert!(text_says_ended("Konkurs zakończony. Wyniki wkrótce."));
        assert!(text_says_ended("ZGŁOSZENIA ZAKOŃCZONE"));
        assert!(text_says_ended("Nie przyjmujemy zgłoszeń po terminie."));
    }

    #[test]
    fn open_wording_leaves_the_contest_open() {
        assert!(!text_says_ended(
            "Odpowiedz na pytanie i wyślij zgłoszenie do niedzieli!"
        ));
        assert!(!text_says_ended(""));
    }

    #[test]
    fn confirmation_markers_match_case_insensitively() {
        assert!(text_confirms_submission(
            "Dziękujemy! Twoje zgłoszenie zostało zapisane."
        ));
        assert!(text_confirms_submission("WYSŁANO ZGŁOSZENIE"));
        assert!(text_confirms_submission("Thank you for your entry"));
        assert!(!text_confirms_submission("Formularz konkursowy"));
    }

    #[test]
    fn confirmation_phrases_survive_line_breaks() {
        assert!(text_confirms_submission("Twoje zgłoszenie\n  zostało zapisane."));
    }
}
