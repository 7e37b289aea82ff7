//! Task-level correction statistics.
//!
//! Aggregates the correction outcome of every item of a task into summary
//! counters and a per-item verdict map. This is the derivation path the
//! backend uses to fill `failure_type` and the summary counters of
//! [`crate::types::TaskDetails`]; the presenter-side classifier only reads
//! those results back.

use std::collections::HashMap;

use serde::Serialize;

use super::verdict::Verdict;
use crate::types::{EvaluationItem, RunStatus};

/// Correction counters for one task.
///
/// The three category counters do not sum to `total_items`: undetermined
/// items are bucketed into `correction_failed_count`, and passed items are
/// tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorrectionStats {
    pub total_items: u64,
    pub passed: u64,
    pub partial_error_count: u64,
    pub correction_failed_count: u64,
}

impl CorrectionStats {
    /// Items that did not pass, regardless of why.
    pub fn failed_total(&self) -> u64 {
        self.total_items - self.passed
    }

    /// Pass percentage over the whole task. Zero for an empty task.
    pub fn accuracy_rate(&self) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total_items as f64 * 100.0
    }
}

/// Streaming aggregator over the items of one task.
#[derive(Debug, Default)]
pub struct CorrectionAggregator {
    total_items: u64,
    passed: u64,
    partial_error_count: u64,
    correction_failed_count: u64,
    item_failure_types: HashMap<String, Verdict>,
}

impl CorrectionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one item into the counters and record its verdict.
    ///
    /// An explicit `is_passed == true` short-circuits to PASS. Otherwise the
    /// runs decide: any non-SUCCEEDED run or any FAILED/SKIPPED correction
    /// blocks a determination (CORRECTION_FAILED); a completed correction
    /// pass with at least one incorrect judgment is PARTIAL_ERROR; items
    /// that fit neither stay UNDETERMINED and are counted with the
    /// correction failures.
    pub fn observe_item(&mut self, item: &EvaluationItem) {
        self.total_items += 1;

        if item.is_passed == Some(true) {
            self.passed += 1;
            self.item_failure_types
                .insert(item.question_id.clone(), Verdict::Pass);
            return;
        }

        let mut has_incorrect = false;
        let mut correction_failed = false;

        for run in &item.runs {
            if run.status != RunStatus::Succeeded {
                correction_failed = true;
                continue;
            }
            match run.correction_status.as_deref() {
                Some("SUCCESS") => {
                    if run.correction_result == Some(false) {
                        has_incorrect = true;
                    }
                }
                Some("FAILED") | Some("SKIPPED") => correction_failed = true,
                _ => {}
            }
        }

        let verdict = if correction_failed {
            self.correction_failed_count += 1;
            Verdict::CorrectionFailed
        } else if has_incorrect {
            self.partial_error_count += 1;
            Verdict::PartialError
        } else {
            self.correction_failed_count += 1;
            Verdict::Undetermined
        };
        self.item_failure_types
            .insert(item.question_id.clone(), verdict);
    }

    /// Verdict recorded for a question, if it was observed.
    pub fn failure_type(&self, question_id: &str) -> Option<Verdict> {
        self.item_failure_types.get(question_id).copied()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CorrectionStats {
        CorrectionStats {
            total_items: self.total_items,
            passed: self.passed,
            partial_error_count: self.partial_error_count,
            correction_failed_count: self.correction_failed_count,
        }
    }
}
