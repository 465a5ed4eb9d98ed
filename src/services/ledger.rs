//! Append-only CSV ledger.
//!
//! The ledger file is the only memory the agent has: quota decisions are
//! recomputed from it on every check, so restarts and concurrent runs see
//! the same history. Rows are never rewritten.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::error::AgentError;
use crate::models::{LedgerEntry, COUNTED_STATUSES};

const HEADER: &str = "timestamp,contest_url,question,answer,mode,status,source";

/// CSV ledger of contest attempts.
#[derive(Clone)]
pub struct Ledger {
    path: PathBuf,
    offset: FixedOffset,
}

impl Ledger {
    /// Ledger over `path`, with "today" computed at the given offset east
    /// of UTC.
    pub fn new(path: impl Into<PathBuf>, utc_offset_hours: i32) -> Self {
        let offset =
            FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
        Self {
            path: path.into(),
            offset,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Local date (YYYY-MM-DD) under the ledger clock.
    pub fn today(&self) -> String {
        self.now().format("%Y-%m-%d").to_string()
    }

    /// Create the file with its header row when missing.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        std::fs::write(&self.path, format!("{}\n", HEADER)).map_err(|e| AgentError::Ledger {
            path: self.path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    /// Append one attempt, stamped with the current local timestamp.
    pub fn append(&self, entry: &LedgerEntry) -> Result<()> {
        let timestamp = self.now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        let status = entry.status.label();
        let row = [
            timestamp.as_str(),
            entry.contest_url.as_str(),
            entry.question.as_str(),
            entry.answer.as_str(),
            entry.mode.as_str(),
            status.as_str(),
            entry.source.as_str(),
        ]
        .iter()
        .map(|f| quote_field(f))
        .collect::<Vec<_>>()
        .join(",");

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| AgentError::Ledger {
                path: self.path.display().to_string(),
                source: e,
            })?;
        writeln!(file, "{}", row).map_err(|e| AgentError::Ledger {
            path: self.path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    /// Count today's counted submissions by re-reading the whole file.
    ///
    /// Unreadable files and malformed rows count as zero; quota checks must
    /// never take the run down.
    pub fn count_today_counted(&self) -> usize {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(_) => return 0,
        };
        let today = self.today();
        let mut count = 0;
        for row in parse_rows(&text).into_iter().skip(1) {
            if row.len() < 6 {
                continue;
            }
            let date = row[0].split('T').next().unwrap_or("").trim().to_string();
            let status = row[5].trim();
            if date == today && COUNTED_STATUSES.contains(status) {
                count += 1;
            }
        }
        count
    }
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split CSV text into rows of fields, honoring quoted fields that span
/// commas and line breaks.
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn entry(status: Status) -> LedgerEntry {
        LedgerEntry {
            contest_url: "https://www.filmweb.pl/contest/Quiz".to_string(),
            question: "W którym roku powstał film?".to_string(),
            answer: "1994".to_string(),
            mode: "auto->fact".to_string(),
            status,
            source: "https://www.bing.com/search?q=rok".to_string(),
        }
    }

    #[test]
    fn initialization_writes_the_header_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("log.csv");
        let ledger = Ledger::new(&path, 1);

        ledger.ensure_initialized().expect("init");
        ledger.append(&entry(Status::Sent)).expect("append");
        ledger.ensure_initialized().expect("second init");

        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text.matches("timestamp,contest_url").count(), 1);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn only_counted_statuses_raise_the_daily_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = Ledger::new(dir.path().join("log.csv"), 1);
        ledger.ensure_initialized().expect("init");

        ledger.append(&entry(Status::Sent)).expect("append");
        ledger.append(&entry(Status::SentConfirmed)).expect("append");
        ledger.append(&entry(Status::DryFilled)).expect("append");
        ledger.append(&entry(Status::SkippedEnded)).expect("append");
        ledger.append(&entry(Status::NotSent)).expect("append");
        ledger
            .append(&entry(Status::Error {
                kind: "Navigation".to_string(),
                message: "timed out".to_string(),
            }))
            .expect("append");

        assert_eq!(ledger.count_today_counted(), 2);
    }

    #[test]
    fn legacy_unconfirmed_rows_still_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("log.csv");
        let ledger = Ledger::new(&path, 1);
        ledger.ensure_initialized().expect("init");

        let row = format!(
            "{}T09:00:00.000001,https://www.filmweb.pl/contest/Old,q,a,fact,SENT_UNCONFIRMED,\n",
            ledger.today()
        );
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut f| std::io::Write::write_all(&mut f, row.as_bytes()))
            .expect("raw append");

        assert_eq!(ledger.count_today_counted(), 1);
    }

    #[test]
    fn rows_from_other_days_do_not_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("log.csv");
        let ledger = Ledger::new(&path, 1);
        ledger.ensure_initialized().expect("init");

        let raw = "2001-01-01T12:00:00.000000,https://www.filmweb.pl/contest/Old,q,a,fact,SENT,\n";
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut f| std::io::Write::write_all(&mut f, raw.as_bytes()))
            .expect("raw append");
        ledger.append(&entry(Status::Sent)).expect("append");

        assert_eq!(ledger.count_today_counted(), 1);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("log.csv");
        let ledger = Ledger::new(&path, 1);
        ledger.ensure_initialized().expect("init");

        let raw = format!("garbage\n{}T01:02:03.000000,only,three\n", ledger.today());
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut f| std::io::Write::write_all(&mut f, raw.as_bytes()))
            .expect("raw append");
        ledger.append(&entry(Status::SentConfirmed)).expect("append");

        assert_eq!(ledger.count_today_counted(), 1);
    }

    #[test]
    fn quoted_fields_survive_commas_quotes_and_newlines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("log.csv");
        let ledger = Ledger::new(&path, 1);
        ledger.ensure_initialized().expect("init");

        let mut tricky = entry(Status::Sent);
        tricky.answer = "linia pierwsza,\nlinia \"druga\"".to_string();
        ledger.append(&tricky).expect("append");

        let text = std::fs::read_to_string(&path).expect("read");
        let rows = parse_rows(&text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 7);
        assert_eq!(rows[1][3], "linia pierwsza,\nlinia \"druga\"");
        assert_eq!(ledger.count_today_counted(), 1);
    }

    #[test]
    fn missing_file_counts_zero() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ledger = Ledger::new(dir.path().join("absent.csv"), 1);
        assert_eq!(ledger.count_today_counted(), 0);
    }
}
