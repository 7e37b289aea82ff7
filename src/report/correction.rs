//! Per-run correction status resolution.
//!
//! Collapses the raw correction fields of a run into a presentation-ready
//! tag plus optional hint. The mapping is total: every raw value, including
//! unrecognized strings, resolves to exactly one display state.

use serde::Serialize;

use super::TagColor;
use crate::types::EvaluationRun;

const FAILED_FALLBACK_HINT: &str = "correction call failed";
const SKIPPED_FALLBACK_HINT: &str = "correction was not executed";

/// Resolved correction presentation for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionDisplay {
    /// Fixed tag text.
    pub label: &'static str,
    /// Fixed tag color.
    pub color: TagColor,
    /// Explanatory line under the run output, when the state carries one.
    pub hint: Option<String>,
}

/// Resolve the correction fields of a run.
///
/// Only meaningful when the parent task has correction enabled; the
/// presenter does not call this otherwise. An absent `correction_status`
/// counts as PENDING, and so does any unrecognized value.
pub fn resolve_correction(run: &EvaluationRun) -> CorrectionDisplay {
    match run.correction_status.as_deref().unwrap_or("PENDING") {
        "SUCCESS" => {
            // Only an explicit true is a correct judgment.
            if run.correction_result == Some(true) {
                CorrectionDisplay {
                    label: "correction: correct",
                    color: TagColor::Green,
                    hint: run.correction_reason.clone(),
                }
            } else {
                CorrectionDisplay {
                    label: "correction: incorrect",
                    color: TagColor::Red,
                    hint: run.correction_reason.clone(),
                }
            }
        }
        "FAILED" => CorrectionDisplay {
            label: "correction failed",
            color: TagColor::Orange,
            hint: Some(
                run.correction_error_message
                    .clone()
                    .unwrap_or_else(|| FAILED_FALLBACK_HINT.to_string()),
            ),
        },
        "SKIPPED" => CorrectionDisplay {
            label: "correction not executed",
            color: TagColor::Neutral,
            hint: Some(
                run.correction_error_message
                    .clone()
                    .unwrap_or_else(|| SKIPPED_FALLBACK_HINT.to_string()),
            ),
        },
        _ => CorrectionDisplay {
            label: "correction in progress",
            color: TagColor::Neutral,
            hint: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RunStatus;
    use chrono::Utc;

    fn run(status: Option<&str>, result: Option<bool>) -> EvaluationRun {
        EvaluationRun {
            run_index: 1,
            status: RunStatus::Succeeded,
            response_body: Some("output".to_string()),
            latency_ms: Some(1200),
            error_code: None,
            error_message: None,
            created_at: Utc::now(),
            correction_status: status.map(str::to_string),
            correction_result: result,
            correction_reason: None,
            correction_error_message: None,
            correction_retries: None,
        }
    }

    #[test]
    fn test_success_correct() {
        let mut r = run(Some("SUCCESS"), Some(true));
        r.correction_reason = Some("matches the standard answer".to_string());
        let display = resolve_correction(&r);
        assert_eq!(display.label, "correction: correct");
        assert_eq!(display.color, TagColor::Green);
        assert_eq!(display.hint.as_deref(), Some("matches the standard answer"));
    }

    #[test]
    fn test_success_incorrect() {
        let display = resolve_correction(&run(Some("SUCCESS"), Some(false)));
        assert_eq!(display.label, "correction: incorrect");
        assert_eq!(display.color, TagColor::Red);
        assert_eq!(display.hint, None);
    }

    #[test]
    fn test_success_without_result_counts_as_incorrect() {
        let display = resolve_correction(&run(Some("SUCCESS"), None));
        assert_eq!(display.label, "correction: incorrect");
    }

    #[test]
    fn test_failed_falls_back_to_fixed_hint() {
        // No error message upstream still yields a non-empty hint.
        let display = resolve_correction(&run(Some("FAILED"), None));
        assert_eq!(display.label, "correction failed");
        assert_eq!(display.color, TagColor::Orange);
        assert_eq!(display.hint.as_deref(), Some("correction call failed"));
    }

    #[test]
    fn test_failed_prefers_upstream_error_message() {
        let mut r = run(Some("FAILED"), None);
        r.correction_error_message = Some("judge endpoint returned 500".to_string());
        let display = resolve_correction(&r);
        assert_eq!(display.hint.as_deref(), Some("judge endpoint returned 500"));
    }

    #[test]
    fn test_skipped() {
        let display = resolve_correction(&run(Some("SKIPPED"), None));
        assert_eq!(display.label, "correction not executed");
        assert_eq!(display.color, TagColor::Neutral);
        assert_eq!(display.hint.as_deref(), Some("correction was not executed"));
    }

    #[test]
    fn test_pending_and_absent() {
        for status in [Some("PENDING"), None] {
            let display = resolve_correction(&run(status, None));
            assert_eq!(display.label, "correction in progress");
            assert_eq!(display.color, TagColor::Neutral);
            assert_eq!(display.hint, None);
        }
    }

    #[test]
    fn test_unrecognized_status_behaves_as_pending() {
        for status in ["RUNNING", "success", ""] {
            let display = resolve_correction(&run(Some(status), Some(true)));
            assert_eq!(display.label, "correction in progress");
            assert_eq!(display.hint, None);
        }
    }
}
