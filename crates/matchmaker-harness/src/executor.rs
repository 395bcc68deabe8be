//! Test-reporting executor.
//!
//! Scenarios record assertions through a [`TestHandle`]; the executor turns
//! finished scenarios into TAP output and a [`RunSummary`]. Assertion
//! failures are reported, never raised: a failing scenario does not stop
//! the scenarios after it.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::CallResult;

/// One recorded assertion
#[derive(Debug, Clone)]
pub struct AssertionRecord {
    pub ok: bool,
    pub message: String,
    /// Mismatch details for failed comparisons
    pub detail: Option<String>,
}

/// Assertion handle passed to scenario bodies.
///
/// Clones share one record list; the harness keeps a clone to drain the
/// records once the scenario future completes.
#[derive(Clone)]
pub struct TestHandle {
    records: Arc<Mutex<Vec<AssertionRecord>>>,
}

impl TestHandle {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record a boolean check
    pub fn assert(&self, ok: bool, message: &str) {
        self.records.lock().push(AssertionRecord {
            ok,
            message: message.to_string(),
            detail: None,
        });
    }

    /// Record an equality check
    pub fn equal<T: PartialEq + Debug>(&self, actual: T, expected: T, message: &str) {
        let ok = actual == expected;
        let detail =
            (!ok).then(|| format!("expected {:?}, got {:?}", expected, actual));
        self.records.lock().push(AssertionRecord {
            ok,
            message: message.to_string(),
            detail,
        });
    }

    /// Record that a call produced no `Err` payload
    pub fn err_absent(&self, result: &CallResult, message: &str) {
        let detail = result.err().map(|err| format!("Err payload: {}", err));
        self.records.lock().push(AssertionRecord {
            ok: !result.is_err(),
            message: message.to_string(),
            detail,
        });
    }

    /// Drain the recorded assertions
    pub fn take_records(&self) -> Vec<AssertionRecord> {
        let mut records = self.records.lock();
        std::mem::take(&mut *records)
    }
}

impl Default for TestHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one executed scenario
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub assertions: Vec<AssertionRecord>,
    /// Error or contained panic that aborted the scenario body, if any
    pub error: Option<String>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.assertions.iter().all(|record| record.ok)
    }
}

/// Totals across one harness run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub scenarios: usize,
    pub scenarios_failed: usize,
    pub assertions: usize,
    pub assertions_failed: usize,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.scenarios_failed == 0
    }

    /// Process exit code under the executor's convention
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Consumes scenario outcomes and produces the run summary
pub trait Executor: Send {
    fn scenario_started(&mut self, name: &str);
    fn scenario_finished(&mut self, name: &str, outcome: ScenarioOutcome);
    fn summary(&self) -> RunSummary;
}

/// TAP (Test Anything Protocol) reporting executor
pub struct TapExecutor {
    summary: RunSummary,
    next_test_number: usize,
    header_printed: bool,
}

impl TapExecutor {
    pub fn new() -> Self {
        Self {
            summary: RunSummary::default(),
            next_test_number: 1,
            header_printed: false,
        }
    }
}

impl Default for TapExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for TapExecutor {
    fn scenario_started(&mut self, name: &str) {
        if !self.header_printed {
            println!("TAP version 13");
            self.header_printed = true;
        }
        println!("# {}", name);
    }

    fn scenario_finished(&mut self, name: &str, outcome: ScenarioOutcome) {
        self.summary.scenarios += 1;
        if !outcome.passed() {
            self.summary.scenarios_failed += 1;
        }

        for record in &outcome.assertions {
            self.summary.assertions += 1;
            if record.ok {
                println!("ok {} - {}", self.next_test_number, record.message);
            } else {
                self.summary.assertions_failed += 1;
                println!("not ok {} - {}", self.next_test_number, record.message);
                if let Some(detail) = &record.detail {
                    println!("  ---");
                    println!("  {}", detail);
                    println!("  ...");
                }
            }
            self.next_test_number += 1;
        }

        if let Some(error) = &outcome.error {
            self.summary.assertions += 1;
            self.summary.assertions_failed += 1;
            println!(
                "not ok {} - scenario '{}' aborted: {}",
                self.next_test_number, name, error
            );
            self.next_test_number += 1;
        }
    }

    fn summary(&self) -> RunSummary {
        if self.summary.assertions > 0 {
            println!("1..{}", self.summary.assertions);
        }
        println!(
            "# scenarios: {} run, {} failed",
            self.summary.scenarios, self.summary.scenarios_failed
        );
        println!(
            "# assertions: {} run, {} failed",
            self.summary.assertions, self.summary.assertions_failed
        );
        self.summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handle_records_pass_and_fail() {
        let t = TestHandle::new();
        t.assert(true, "holds");
        t.equal(46, 45, "lengths match");

        let records = t.take_records();
        assert_eq!(records.len(), 2);
        assert!(records[0].ok);
        assert!(!records[1].ok);
        assert!(records[1].detail.as_deref().unwrap().contains("expected 45"));

        // Drained
        assert!(t.take_records().is_empty());
    }

    #[test]
    fn test_handle_err_absent() {
        let t = TestHandle::new();
        t.err_absent(&CallResult::Ok(json!("fine")), "no error");
        t.err_absent(&CallResult::Err(json!("boom")), "no error");

        let records = t.take_records();
        assert!(records[0].ok);
        assert!(!records[1].ok);
        assert!(records[1].detail.as_deref().unwrap().contains("boom"));
    }

    #[test]
    fn test_clones_share_records() {
        let t = TestHandle::new();
        let clone = t.clone();
        clone.assert(true, "recorded via clone");
        assert_eq!(t.take_records().len(), 1);
    }

    #[test]
    fn test_tap_executor_counts_failures() {
        let mut executor = TapExecutor::new();
        executor.scenario_started("first");
        executor.scenario_finished(
            "first",
            ScenarioOutcome {
                assertions: vec![
                    AssertionRecord {
                        ok: true,
                        message: "a".into(),
                        detail: None,
                    },
                    AssertionRecord {
                        ok: false,
                        message: "b".into(),
                        detail: None,
                    },
                ],
                error: None,
            },
        );
        executor.scenario_started("second");
        executor.scenario_finished(
            "second",
            ScenarioOutcome {
                assertions: vec![],
                error: Some("exploded".into()),
            },
        );

        let summary = executor.summary();
        assert_eq!(summary.scenarios, 2);
        assert_eq!(summary.scenarios_failed, 2);
        assert_eq!(summary.assertions, 3);
        assert_eq!(summary.assertions_failed, 2);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_all_passing_summary_succeeds() {
        let mut executor = TapExecutor::new();
        executor.scenario_started("only");
        executor.scenario_finished(
            "only",
            ScenarioOutcome {
                assertions: vec![AssertionRecord {
                    ok: true,
                    message: "fine".into(),
                    detail: None,
                }],
                error: None,
            },
        );
        let summary = executor.summary();
        assert!(summary.success());
        assert_eq!(summary.exit_code(), 0);
    }
}
