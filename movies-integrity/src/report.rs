//! Integrity run report

use chrono::{DateTime, Utc};
use movies_common::db::ParentTable;
use movies_common::integrity::{CheckOutcome, DeleteOutcome, Expectation, IntegrityCheck};
use movies_common::Error;
use serde::Serialize;
use std::fmt::Write as _;

/// One line of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub table: ParentTable,
    pub id: i64,
    pub expectation: Expectation,
    /// Missing when the check failed before its delete was classified
    pub outcome: Option<DeleteOutcome>,
    pub present_after: Option<bool>,
    pub passed: bool,
    pub error: Option<String>,
}

impl CheckResult {
    pub fn from_outcome(outcome: &CheckOutcome) -> Self {
        Self {
            name: outcome.name.to_string(),
            table: outcome.table,
            id: outcome.id,
            expectation: outcome.expectation,
            outcome: Some(outcome.outcome),
            present_after: Some(outcome.present_after),
            passed: outcome.passed,
            error: None,
        }
    }

    pub fn from_error(check: &IntegrityCheck, error: &Error) -> Self {
        Self {
            name: check.name.to_string(),
            table: check.target.table,
            id: check.target.id,
            expectation: check.expectation,
            outcome: None,
            present_after: None,
            passed: false,
            error: Some(error.to_string()),
        }
    }
}

/// Results of one run over a working snapshot
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub checked_at: DateTime<Utc>,
    pub snapshot: String,
    pub foreign_keys_enforced: bool,
    pub results: Vec<CheckResult>,
}

impl IntegrityReport {
    pub fn new(snapshot: &str, foreign_keys_enforced: bool) -> Self {
        Self {
            checked_at: movies_common::time::now(),
            snapshot: snapshot.to_string(),
            foreign_keys_enforced,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering, one line per check plus a summary line
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Snapshot {} (foreign keys {})",
            self.snapshot,
            if self.foreign_keys_enforced { "on" } else { "off" }
        );

        for result in &self.results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            let detail = match (&result.outcome, &result.error) {
                (_, Some(error)) => format!("error: {}", error),
                (Some(outcome), None) => format!("{:?}", outcome),
                (None, None) => "not run".to_string(),
            };
            let _ = writeln!(
                out,
                "[{}] {} ({} {}): {}",
                status, result.name, result.table, result.id, detail
            );
        }

        let _ = writeln!(out, "{} passed, {} failed", self.passed(), self.failed());
        out
    }
}
