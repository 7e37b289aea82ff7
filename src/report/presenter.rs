//! Page composition for the results view.
//!
//! Projects one fetched results page into the renderable report structure:
//! grouped rows with continuous question numbering, per-run panels with
//! resolved correction tags, and the optional task summary line. The
//! projection is pure; the fetched snapshot is never mutated.

use serde::Serialize;

use super::correction::{resolve_correction, CorrectionDisplay};
use super::grouping::group_by_session;
use super::verdict::{classify_item, Verdict};
use super::TagColor;
use crate::format::{format_accuracy, format_count, format_latency_seconds};
use crate::types::{EvaluationRun, ResultsResponse, TaskDetails};

/// Verdict chrome for one item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerdictTag {
    pub category: Verdict,
    pub label: &'static str,
    pub color: TagColor,
    pub hint: &'static str,
}

impl From<Verdict> for VerdictTag {
    fn from(verdict: Verdict) -> Self {
        Self {
            category: verdict,
            label: verdict.label(),
            color: verdict.color(),
            hint: verdict.hint(),
        }
    }
}

/// One run panel inside an item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRun {
    /// 1-based index as assigned during evaluation.
    pub run_index: u32,
    /// Whether the run renders in its error form.
    pub is_error: bool,
    /// Status tag text: the error code for failed runs, `success` otherwise.
    pub status_label: String,
    pub status_color: TagColor,
    /// Formatted latency, e.g. `1.43s`.
    pub latency: String,
    /// Response body, or the error text for failed runs.
    pub body: String,
    /// Resolved correction tag. `None` when correction is disabled for the
    /// task.
    pub correction: Option<CorrectionDisplay>,
}

/// One question row of the report.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedItem {
    /// Global 1-based position across all pages.
    pub question_index: u64,
    /// 1-based round number within a session group. `None` for standalone
    /// items, which render with the plain question label.
    pub round_index: Option<u32>,
    pub question_id: String,
    pub question: String,
    pub standard_answer: String,
    /// Verdict chrome. `None` when correction is disabled for the task.
    pub verdict: Option<VerdictTag>,
    pub runs: Vec<RenderedRun>,
}

/// One rendered group: a multi-turn session block or a standalone row.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedGroup {
    pub session_group: Option<String>,
    pub rows: Vec<RenderedItem>,
}

/// Aggregate line above the result list, shown only for correction tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub accuracy: String,
    pub passed: String,
    pub total: String,
    pub failed: String,
    pub partial_error: String,
    pub correction_failed: String,
}

impl SummaryLine {
    fn from_task(task: &TaskDetails) -> Self {
        Self {
            accuracy: format_accuracy(task.accuracy_rate),
            passed: format_count(task.passed_count),
            total: format_count(task.total_items),
            failed: format_count(task.failed_count),
            partial_error: format_count(task.partial_error_count),
            correction_failed: format_count(task.correction_failed_count),
        }
    }
}

/// The fully composed report for one page.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub task_name: String,
    /// `None` when correction is disabled; the view then renders no summary
    /// line at all.
    pub summary: Option<SummaryLine>,
    pub groups: Vec<RenderedGroup>,
    /// 1-based page number this projection was built from.
    pub page: u32,
    pub page_size: u32,
    /// Total questions across all pages, for the pagination footer.
    pub total_questions: u64,
}

/// Compose the renderable report for one fetched page.
pub fn present_page(response: &ResultsResponse) -> ReportPage {
    let enable_correction = response.task.enable_correction;
    let page = response.pagination.page;
    let page_size = response.pagination.page_size;

    // Question numbering continues across pages and ignores group
    // boundaries.
    let base = (page.max(1) as u64 - 1) * page_size as u64;
    let mut offset = 0u64;

    let mut groups = Vec::new();
    for group in group_by_session(response.items.clone()) {
        let mut rows = Vec::with_capacity(group.items.len());
        for (position, item) in group.items.iter().enumerate() {
            offset += 1;
            rows.push(RenderedItem {
                question_index: base + offset,
                round_index: group
                    .session_group
                    .is_some()
                    .then(|| (position + 1) as u32),
                question_id: item.question_id.clone(),
                question: item.question.clone(),
                standard_answer: item.standard_answer.clone(),
                verdict: classify_item(item, enable_correction).map(VerdictTag::from),
                runs: item
                    .runs
                    .iter()
                    .map(|run| render_run(run, enable_correction))
                    .collect(),
            });
        }
        groups.push(RenderedGroup {
            session_group: group.session_group,
            rows,
        });
    }

    ReportPage {
        task_name: response.task.task_name.clone(),
        summary: enable_correction.then(|| SummaryLine::from_task(&response.task)),
        groups,
        page,
        page_size,
        total_questions: response.pagination.total,
    }
}

fn render_run(run: &EvaluationRun, enable_correction: bool) -> RenderedRun {
    let is_error = run.status.is_error();

    let (status_label, status_color) = if is_error {
        (
            run.error_code.clone().unwrap_or_else(|| "failed".to_string()),
            TagColor::Red,
        )
    } else {
        ("success".to_string(), TagColor::Green)
    };

    let body = if is_error {
        run.error_message
            .clone()
            .or_else(|| run.error_code.clone())
            .unwrap_or_else(|| "request failed".to_string())
    } else {
        run.response_body.clone().unwrap_or_default()
    };

    RenderedRun {
        run_index: run.run_index,
        is_error,
        status_label,
        status_color,
        latency: format_latency_seconds(run.latency_ms),
        body,
        correction: enable_correction.then(|| resolve_correction(run)),
    }
}
