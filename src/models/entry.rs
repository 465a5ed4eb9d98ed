//! Ledger entry model
//!
//! One row per contest attempt, plus the status vocabulary shared by the
//! workflow and the quota counter.

use std::fmt;

use phf::phf_set;

/// Status labels that count toward the daily submission quota.
///
/// `SENT_UNCONFIRMED` is only found in ledgers written by earlier versions;
/// it is never produced here but those rows still count.
pub static COUNTED_STATUSES: phf::Set<&'static str> = phf_set! {
    "SENT",
    "SENT_CONFIRMED",
    "SENT_UNCONFIRMED",
};

/// Terminal outcome of one contest attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Submission clicked, no confirmation phrase seen.
    Sent,
    /// Submission clicked and the page confirmed it.
    SentConfirmed,
    /// No usable submit control, nothing was sent.
    NotSent,
    /// Dry run: form filled, submission deliberately skipped.
    DryFilled,
    /// Contest already closed; excluded from quota and scan tallies.
    SkippedEnded,
    /// Processing failed; `kind` is a stable error-family label.
    Error { kind: String, message: String },
}

impl Status {
    /// Label written to the ledger's status column.
    pub fn label(&self) -> String {
        match self {
            Status::Sent => "SENT".to_string(),
            Status::SentConfirmed => "SENT_CONFIRMED".to_string(),
            Status::NotSent => "NOT_SENT".to_string(),
            Status::DryFilled => "DRY_FILLED".to_string(),
            Status::SkippedEnded => "SKIPPED_ENDED".to_string(),
            Status::Error { kind, message } => format!("ERROR:{}:{}", kind, message),
        }
    }

    /// Whether this outcome counts toward the daily quota.
    pub fn is_counted(&self) -> bool {
        COUNTED_STATUSES.contains(self.label().as_str())
    }

    pub fn is_skipped_ended(&self) -> bool {
        matches!(self, Status::SkippedEnded)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One ledger row, minus the timestamp (stamped at append time).
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub contest_url: String,
    pub question: String,
    pub answer: String,
    /// Effective mode label (`fact`, `creative`, `auto->fact`, ...).
    pub mode: String,
    pub status: Status,
    /// Provenance of fact answers, empty otherwise.
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_the_ledger_vocabulary() {
        assert_eq!(Status::Sent.label(), "SENT");
        assert_eq!(Status::SentConfirmed.label(), "SENT_CONFIRMED");
        assert_eq!(Status::NotSent.label(), "NOT_SENT");
        assert_eq!(Status::DryFilled.label(), "DRY_FILLED");
        assert_eq!(Status::SkippedEnded.label(), "SKIPPED_ENDED");
        assert_eq!(
            Status::Error {
                kind: "Navigation".to_string(),
                message: "timed out".to_string(),
            }
            .label(),
            "ERROR:Navigation:timed out"
        );
    }

    #[test]
    fn only_sent_outcomes_count() {
        assert!(Status::Sent.is_counted());
        assert!(Status::SentConfirmed.is_counted());
        assert!(!Status::NotSent.is_counted());
        assert!(!Status::DryFilled.is_counted());
        assert!(!Status::SkippedEnded.is_counted());
        assert!(!Status::Error {
            kind: "Script".to_string(),
            message: "boom".to_string(),
        }
        .is_counted());
    }

    #[test]
    fn legacy_unconfirmed_label_still_counts() {
        assert!(COUNTED_STATUSES.contains("SENT_UNCONFIRMED"));
    }
}
