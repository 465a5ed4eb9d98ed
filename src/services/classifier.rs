//! Question classifier.
//!
//! Routes each contest question to the fact pipeline (web lookup) or the
//! creative pipeline (composed answer). Polish marker vocabulary, matched
//! on the lowercased question.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::QuestionKind;

static FACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bw\s*którym\s+roku\b",
        r"(?i)\bkiedy\b",
        r"(?i)\bdata\b",
        r"(?i)\brok\b",
        r"(?i)\bile\b",
        r"(?i)\biloma\b",
        r"(?i)\bil[eao]\s+odcink",
        r"(?i)\breżyser\b",
        r"(?i)\bkto\b",
        r"(?i)\bktóry\b.*\b(rok|sezon|odcinek)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hardcoded pattern compiles"))
    .collect()
});

static CREATIVE_HINTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\buzasadnij\b",
        r"(?i)\bnapisz\b",
        r"(?i)\bdlaczego\b",
        r"(?i)\btwoim zdaniem\b",
        r"(?i)\bopisz\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hardcoded pattern compiles"))
    .collect()
});

/// Classify a contest question.
///
/// Any fact marker wins outright, even in questions that also ask for a
/// justification. Everything else, opinion prompts included, goes to the
/// creative pipeline.
pub fn classify(question: &str) -> QuestionKind {
    let lowered = question.to_lowercase();
    if FACT_PATTERNS.iter().any(|p| p.is_match(&lowered)) {
        return QuestionKind::Fact;
    }
    if CREATIVE_HINTS.iter().any(|p| p.is_match(&lowered)) {
        return QuestionKind::Creative;
    }
    QuestionKind::Creative
}
