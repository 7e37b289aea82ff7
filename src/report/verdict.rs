//! Per-item verdict classification.
//!
//! Maps an item's precomputed correction outcome to one of a closed set of
//! verdict categories. The categories are only ever supplied by the backend
//! correction pass; this classifier never re-derives them from raw run data.
//! When the backend categorization is absent the item stays
//! [`Verdict::Undetermined`].

use serde::{Deserialize, Serialize};

use super::TagColor;
use crate::types::EvaluationItem;

/// Verdict category for one evaluated item.
///
/// Doubles as the wire representation of the `failure_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Every run's correction judgment resolved to "correct".
    Pass,
    /// At least one run was judged incorrect under a completed correction
    /// pass.
    PartialError,
    /// Correction could not be completed for at least one run, blocking a
    /// determination.
    CorrectionFailed,
    /// Correction is still pending or no categorization was supplied.
    Undetermined,
}

impl Verdict {
    /// Fixed display label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::PartialError => "partial error",
            Verdict::CorrectionFailed => "correction failed",
            Verdict::Undetermined => "undetermined",
        }
    }

    /// Fixed color token.
    pub fn color(&self) -> TagColor {
        match self {
            Verdict::Pass => TagColor::Green,
            Verdict::PartialError => TagColor::Red,
            Verdict::CorrectionFailed => TagColor::Orange,
            Verdict::Undetermined => TagColor::Neutral,
        }
    }

    /// Fixed explanatory hint shown under the verdict tag.
    pub fn hint(&self) -> &'static str {
        match self {
            Verdict::Pass => "all runs were judged correct",
            Verdict::PartialError => "at least one run was judged incorrect",
            Verdict::CorrectionFailed => {
                "correction failed or was skipped, the item cannot be judged"
            }
            Verdict::Undetermined => "correction has not run or has not finished yet",
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::PartialError => "PARTIAL_ERROR",
            Verdict::CorrectionFailed => "CORRECTION_FAILED",
            Verdict::Undetermined => "UNDETERMINED",
        }
    }
}

/// Classify one item.
///
/// Returns `None` when correction is disabled for the task; the presenter
/// then omits verdict chrome entirely. Otherwise the backend-supplied
/// `failure_type` is authoritative; without it only an explicit
/// `is_passed == true` yields [`Verdict::Pass`], everything else is
/// [`Verdict::Undetermined`].
pub fn classify_item(item: &EvaluationItem, enable_correction: bool) -> Option<Verdict> {
    if !enable_correction {
        return None;
    }
    if let Some(failure_type) = item.failure_type {
        return Some(failure_type);
    }
    if item.is_passed == Some(true) {
        return Some(Verdict::Pass);
    }
    Some(Verdict::Undetermined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(failure_type: Option<Verdict>, is_passed: Option<bool>) -> EvaluationItem {
        EvaluationItem {
            question_id: "q-1".to_string(),
            question: "question".to_string(),
            standard_answer: "answer".to_string(),
            system_prompt: None,
            user_context: None,
            session_group: None,
            is_passed,
            failure_type,
            runs: vec![],
        }
    }

    #[test]
    fn test_correction_disabled_yields_no_verdict() {
        for failure_type in [
            None,
            Some(Verdict::Pass),
            Some(Verdict::PartialError),
            Some(Verdict::CorrectionFailed),
            Some(Verdict::Undetermined),
        ] {
            for is_passed in [None, Some(true), Some(false)] {
                assert_eq!(classify_item(&item(failure_type, is_passed), false), None);
            }
        }
    }

    #[test]
    fn test_failure_type_is_authoritative() {
        // A backend categorization wins even against a contradictory
        // is_passed flag.
        let classified = classify_item(&item(Some(Verdict::PartialError), Some(true)), true);
        assert_eq!(classified, Some(Verdict::PartialError));
    }

    #[test]
    fn test_is_passed_true_without_failure_type_is_pass() {
        let classified = classify_item(&item(None, Some(true)), true);
        assert_eq!(classified, Some(Verdict::Pass));
    }

    #[test]
    fn test_absent_categorization_is_undetermined() {
        assert_eq!(
            classify_item(&item(None, Some(false)), true),
            Some(Verdict::Undetermined)
        );
        assert_eq!(
            classify_item(&item(None, None), true),
            Some(Verdict::Undetermined)
        );
    }

    #[test]
    fn test_classification_is_total() {
        // Every failure_type/is_passed combination yields exactly one
        // category when correction is enabled.
        for failure_type in [
            None,
            Some(Verdict::Pass),
            Some(Verdict::PartialError),
            Some(Verdict::CorrectionFailed),
            Some(Verdict::Undetermined),
        ] {
            for is_passed in [None, Some(true), Some(false)] {
                let classified = classify_item(&item(failure_type, is_passed), true);
                assert!(classified.is_some());
            }
        }
    }

    #[test]
    fn test_chrome_is_fixed() {
        assert_eq!(Verdict::Pass.label(), "pass");
        assert_eq!(Verdict::Pass.color(), TagColor::Green);
        assert_eq!(Verdict::PartialError.color(), TagColor::Red);
        assert_eq!(Verdict::CorrectionFailed.color(), TagColor::Orange);
        assert_eq!(Verdict::Undetermined.color(), TagColor::Neutral);
        assert_eq!(
            Verdict::Undetermined.hint(),
            "correction has not run or has not finished yet"
        );
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&Verdict::PartialError).unwrap();
        assert_eq!(json, "\"PARTIAL_ERROR\"");
        let parsed: Verdict = serde_json::from_str("\"CORRECTION_FAILED\"").unwrap();
        assert_eq!(parsed, Verdict::CorrectionFailed);
    }
}
