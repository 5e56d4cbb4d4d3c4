//! Run reports: per-check results, summary tallies, and the overall verdict
//!
//! The report is the sole output of a run. It serializes to the wire shape
//! consumed by downstream tooling:
//!
//! ```json
//! {
//!   "result": "PASS",
//!   "tests": {
//!     "test_ping": {"status": "PASS", "message": "", "time": 0.12}
//!   },
//!   "summary": [1, 1, 0, 0]
//! }
//! ```
//!
//! The run identifier and start timestamp live on the struct for logging
//! and correlation but stay out of the wire shape.

use chrono::{DateTime, Utc};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for one run invocation
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Statuses ─────────────────────────────────────────────────────────

/// Terminal status of a single check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// Explicitly skipped by its own metadata
    Skipped,
    /// Skipped because a (transitive) dependency was skipped
    SkippedDueToDependencySkip,
    /// Skipped because a dependency failed at execution time
    SkippedDueToDependencyFail,
}

impl CheckStatus {
    /// True for any of the three skip variants
    pub fn is_skip(self) -> bool {
        matches!(
            self,
            Self::Skipped | Self::SkippedDueToDependencySkip | Self::SkippedDueToDependencyFail
        )
    }
}

/// Overall verdict of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallResult {
    Pass,
    Fail,
}

// ── Per-check Result ─────────────────────────────────────────────────

/// The recorded outcome of a single check
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// Failure or skip detail; empty on PASS
    pub message: String,
    /// Elapsed seconds, cumulative over repeat attempts
    #[serde(rename = "time")]
    pub elapsed_secs: f64,
}

impl CheckResult {
    pub fn pass(elapsed_secs: f64) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: String::new(),
            elapsed_secs,
        }
    }

    pub fn fail(message: impl Into<String>, elapsed_secs: f64) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
            elapsed_secs,
        }
    }

    /// Explicit skip; the message is the skip reason, possibly empty
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Skipped,
            message: reason.into(),
            elapsed_secs: 0.0,
        }
    }

    pub fn skipped_dependency_skipped(dependency: &str) -> Self {
        Self {
            status: CheckStatus::SkippedDueToDependencySkip,
            message: format!("dependency '{}' was skipped", dependency),
            elapsed_secs: 0.0,
        }
    }

    pub fn skipped_dependency_failed(dependency: &str) -> Self {
        Self {
            status: CheckStatus::SkippedDueToDependencyFail,
            message: format!("dependency '{}' failed", dependency),
            elapsed_secs: 0.0,
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────

/// Tallied counts over all recorded results.
///
/// Serializes as the 4-tuple `[total, passed, failed, skipped]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "(usize, usize, usize, usize)")]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Counts all three skip variants
    pub skipped: usize,
}

impl RunSummary {
    /// Tally a set of recorded results
    pub fn tally<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a CheckResult>,
    {
        let mut summary = Self::default();
        for result in results {
            summary.total += 1;
            match result.status {
                CheckStatus::Pass => summary.passed += 1,
                CheckStatus::Fail => summary.failed += 1,
                _ => summary.skipped += 1,
            }
        }
        summary
    }
}

impl Serialize for RunSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.total)?;
        tuple.serialize_element(&self.passed)?;
        tuple.serialize_element(&self.failed)?;
        tuple.serialize_element(&self.skipped)?;
        tuple.end()
    }
}

impl From<(usize, usize, usize, usize)> for RunSummary {
    fn from((total, passed, failed, skipped): (usize, usize, usize, usize)) -> Self {
        Self {
            total,
            passed,
            failed,
            skipped,
        }
    }
}

// ── Run Report ───────────────────────────────────────────────────────

/// The complete, machine-readable outcome of one run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    /// Overall verdict: FAIL if any check failed
    #[serde(rename = "result")]
    pub overall: OverallResult,
    /// One entry per discovered check, keyed by check name
    #[serde(rename = "tests")]
    pub results: BTreeMap<String, CheckResult>,
    pub summary: RunSummary,
    /// Correlation identifier, not part of the wire shape
    #[serde(skip)]
    pub run_id: RunId,
    /// When the run started, not part of the wire shape
    #[serde(skip_serializing)]
    pub started_at: DateTime<Utc>,
}

impl RunReport {
    /// Build a report from recorded results, computing summary and verdict
    pub fn new(
        run_id: RunId,
        started_at: DateTime<Utc>,
        results: BTreeMap<String, CheckResult>,
    ) -> Self {
        let summary = RunSummary::tally(results.values());
        let overall = if summary.failed > 0 {
            OverallResult::Fail
        } else {
            OverallResult::Pass
        };
        Self {
            overall,
            results,
            summary,
            run_id,
            started_at,
        }
    }

    pub fn result_for(&self, check: &str) -> Option<&CheckResult> {
        self.results.get(check)
    }

    pub fn passed(&self) -> bool {
        self.overall == OverallResult::Pass
    }

    /// Serialize to the wire shape as a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> BTreeMap<String, CheckResult> {
        let mut results = BTreeMap::new();
        results.insert("test_a".into(), CheckResult::pass(0.1));
        results.insert("test_b".into(), CheckResult::fail("boom", 0.2));
        results.insert("test_c".into(), CheckResult::skipped("not today"));
        results.insert(
            "test_d".into(),
            CheckResult::skipped_dependency_skipped("test_c"),
        );
        results.insert(
            "test_e".into(),
            CheckResult::skipped_dependency_failed("test_b"),
        );
        results
    }

    #[test]
    fn test_summary_counts_all_skip_variants() {
        let results = sample_results();
        let summary = RunSummary::tally(results.values());
        assert_eq!(summary.total, 5);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 3);
    }

    #[test]
    fn test_overall_fail_iff_any_failed() {
        let report = RunReport::new(RunId::generate(), Utc::now(), sample_results());
        assert_eq!(report.overall, OverallResult::Fail);

        let mut passing = BTreeMap::new();
        passing.insert("test_a".to_string(), CheckResult::pass(0.1));
        passing.insert("test_b".to_string(), CheckResult::skipped(""));
        let report = RunReport::new(RunId::generate(), Utc::now(), passing);
        assert_eq!(report.overall, OverallResult::Pass);
        assert!(report.passed());
    }

    #[test]
    fn test_wire_shape() {
        let mut results = BTreeMap::new();
        results.insert("test_ping".to_string(), CheckResult::pass(0.25));
        let report = RunReport::new(RunId::generate(), Utc::now(), results);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["result"], "PASS");
        assert_eq!(json["tests"]["test_ping"]["status"], "PASS");
        assert_eq!(json["tests"]["test_ping"]["message"], "");
        assert_eq!(json["tests"]["test_ping"]["time"], 0.25);
        assert_eq!(json["summary"], serde_json::json!([1, 1, 0, 0]));
        assert!(json.get("run_id").is_none());
        assert!(json.get("started_at").is_none());
    }

    #[test]
    fn test_status_wire_tokens() {
        let json = serde_json::to_value(CheckStatus::SkippedDueToDependencySkip).unwrap();
        assert_eq!(json, "SKIPPED_DUE_TO_DEPENDENCY_SKIP");
        let json = serde_json::to_value(CheckStatus::SkippedDueToDependencyFail).unwrap();
        assert_eq!(json, "SKIPPED_DUE_TO_DEPENDENCY_FAIL");
    }

    #[test]
    fn test_run_id_short() {
        let id = RunId::generate();
        assert!(id.short().len() <= 8);
    }
}
