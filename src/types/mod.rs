//! Wire types for the evaluation platform API.
//!
//! Tasks, items, runs and the pagination envelopes exchanged with the
//! evaluation backend. All entities here are server-owned snapshots: the
//! report layer only reads them and derives presentation state, it never
//! mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::verdict::Verdict;

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Lifecycle state of an evaluation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskStatus {
    /// Whether results and export are available for a task in this state.
    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Succeeded)
    }

    /// Wire representation, as stored and filtered on the server side.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Succeeded => "SUCCEEDED",
            TaskStatus::Failed => "FAILED",
        }
    }
}

/// Outcome of a single agent invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Succeeded,
    Failed,
    Timeout,
    Retrying,
}

impl RunStatus {
    /// Whether the run renders as an error. `RETRYING` does not: the run is
    /// still in flight and keeps its last known non-error presentation.
    pub fn is_error(&self) -> bool {
        matches!(self, RunStatus::Failed | RunStatus::Timeout)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::Timeout => "TIMEOUT",
            RunStatus::Retrying => "RETRYING",
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Progress counters for a running task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TaskProgress {
    /// Items evaluated so far. Monotonically non-decreasing while RUNNING.
    pub processed: u64,
    /// Total items in the dataset.
    pub total: u64,
}

/// One evaluation task as it appears in the task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationTask {
    /// Server-assigned task identifier.
    pub task_id: String,
    /// User-supplied display name.
    pub task_name: String,
    /// Lifecycle state.
    pub status: TaskStatus,
    /// Whether automated correction judgment runs for this task.
    pub enable_correction: bool,
    /// Accuracy percentage. Only meaningful once the task SUCCEEDED with
    /// correction enabled.
    #[serde(default)]
    pub accuracy_rate: Option<f64>,
    /// Evaluation progress counters.
    pub progress: TaskProgress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall-clock duration, present once the task completed.
    pub duration_seconds: Option<f64>,
}

/// The task projected for the results view. Adds run configuration and the
/// correction summary counters to the list-level fields.
///
/// The four category counters need not cover `total_items`: items the
/// correction pass could not categorize stay uncounted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetails {
    pub task_id: String,
    pub task_name: String,
    pub status: TaskStatus,
    /// How many times each question was run.
    pub runs_per_item: u32,
    /// Per-invocation timeout applied during evaluation.
    pub timeout_seconds: u64,
    #[serde(default)]
    pub enable_correction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_error_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_failed_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Items and runs
// ---------------------------------------------------------------------------

/// One repeated invocation of the target agent for an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRun {
    /// 1-based position within the item. Unique per item, order-significant.
    pub run_index: u32,
    pub status: RunStatus,
    /// Agent response. Present iff `status` is SUCCEEDED.
    pub response_body: Option<String>,
    pub latency_ms: Option<u64>,
    /// Present iff the run did not succeed.
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Raw correction state: SUCCESS, FAILED, SKIPPED or PENDING. Absent
    /// counts as PENDING.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_status: Option<String>,
    /// The judgment itself. Only meaningful when `correction_status` is
    /// SUCCESS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_result: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_retries: Option<u32>,
}

/// One evaluated question plus its repeated runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationItem {
    /// Unique within a task. Rounds of a multi-turn session each keep their
    /// own question_id; the session is correlated via `session_group`.
    pub question_id: String,
    pub question: String,
    pub standard_answer: String,
    pub system_prompt: Option<String>,
    pub user_context: Option<String>,
    /// Correlation key shared by all rounds of one multi-turn session.
    /// `None` marks a standalone item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_group: Option<String>,
    /// Precomputed pass flag from the correction pass, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_passed: Option<bool>,
    /// Upstream verdict category. Authoritative when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_type: Option<Verdict>,
    #[serde(default)]
    pub runs: Vec<EvaluationRun>,
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Pagination metadata shared by every list-shaped response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    /// Total records across all pages.
    pub total: u64,
}

/// Response of the task list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub items: Vec<EvaluationTask>,
    pub pagination: Pagination,
}

/// Response of the per-task results endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub task: TaskDetails,
    pub items: Vec<EvaluationItem>,
    pub pagination: Pagination,
}

/// Response of task creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
    pub enable_correction: bool,
}

/// Error body returned by the backend on any failure response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Stable machine-readable code, e.g. `TASK_NOT_FOUND`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}
