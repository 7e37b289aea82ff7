//! In-memory task store backing the evaluation API.
//!
//! Tasks live in a concurrent map keyed by task id. The store carries the
//! full result set per task; the route layer derives response projections
//! (summaries, pages, aggregated counters) from it on every request.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::types::{
    EvaluationItem, EvaluationRun, EvaluationTask, RunStatus, TaskDetails, TaskProgress,
    TaskStatus,
};

/// One stored task with its complete result set.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub task: TaskDetails,
    pub progress: TaskProgress,
    pub items: Vec<EvaluationItem>,
}

impl TaskRecord {
    /// Summary row for the task list.
    pub fn summary(&self) -> EvaluationTask {
        let created_at = self.task.created_at.unwrap_or_else(Utc::now);
        let updated_at = self.task.updated_at.unwrap_or(created_at);
        let duration_seconds = self
            .task
            .completed_at
            .map(|end| (end - created_at).num_milliseconds() as f64 / 1000.0);
        EvaluationTask {
            task_id: self.task.task_id.clone(),
            task_name: self.task.task_name.clone(),
            status: self.task.status,
            enable_correction: self.task.enable_correction,
            accuracy_rate: self.task.accuracy_rate,
            progress: self.progress,
            created_at,
            updated_at,
            completed_at: self.task.completed_at,
            duration_seconds,
        }
    }
}

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// All known tasks, keyed by task id.
    pub tasks: Arc<DashMap<String, TaskRecord>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, record: TaskRecord) {
        self.tasks.insert(record.task.task_id.clone(), record);
    }

    pub fn get(&self, task_id: &str) -> Option<TaskRecord> {
        self.tasks.get(task_id).map(|entry| entry.clone())
    }

    /// Task summaries ordered newest first.
    pub fn summaries(&self) -> Vec<EvaluationTask> {
        let mut rows: Vec<EvaluationTask> =
            self.tasks.iter().map(|entry| entry.summary()).collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
        rows
    }

    /// Populate the store with the demo fixtures used by the standalone
    /// server and the integration tests. One task per lifecycle state.
    pub fn seed_demo(&self) {
        let now = Utc::now();
        self.insert(demo_finished_task(now));
        self.insert(demo_running_task(now));
        self.insert(demo_failed_task(now));
        self.insert(demo_pending_task(now));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Demo fixtures
// ---------------------------------------------------------------------------

fn run(
    run_index: u32,
    status: RunStatus,
    response_body: Option<&str>,
    latency_ms: Option<u64>,
    created_at: DateTime<Utc>,
) -> EvaluationRun {
    EvaluationRun {
        run_index,
        status,
        response_body: response_body.map(str::to_string),
        latency_ms,
        error_code: None,
        error_message: None,
        created_at,
        correction_status: None,
        correction_result: None,
        correction_reason: None,
        correction_error_message: None,
        correction_retries: None,
    }
}

fn item(
    question_id: &str,
    question: &str,
    standard_answer: &str,
    session_group: Option<&str>,
    is_passed: Option<bool>,
    runs: Vec<EvaluationRun>,
) -> EvaluationItem {
    EvaluationItem {
        question_id: question_id.to_string(),
        question: question.to_string(),
        standard_answer: standard_answer.to_string(),
        system_prompt: None,
        user_context: None,
        session_group: session_group.map(str::to_string),
        is_passed,
        failure_type: None,
        runs,
    }
}

/// demo-001: a finished correction-enabled run over four questions, two of
/// them rounds of one multi-turn session. Covers every verdict category.
fn demo_finished_task(now: DateTime<Utc>) -> TaskRecord {
    let created = now - Duration::minutes(40);
    let completed = now - Duration::minutes(28);

    let all_correct = item(
        "q-geo-001",
        "What is the capital of France?",
        "Paris",
        None,
        Some(true),
        vec![
            EvaluationRun {
                correction_status: Some("SUCCESS".to_string()),
                correction_result: Some(true),
                correction_reason: Some("answer matches the reference".to_string()),
                ..run(1, RunStatus::Succeeded, Some("Paris"), Some(812), created)
            },
            EvaluationRun {
                correction_status: Some("SUCCESS".to_string()),
                correction_result: Some(true),
                correction_reason: Some("answer matches the reference".to_string()),
                ..run(
                    2,
                    RunStatus::Succeeded,
                    Some("The capital of France is Paris."),
                    Some(1204),
                    created,
                )
            },
        ],
    );

    let one_incorrect = item(
        "q-geo-002",
        "What is the capital of Australia?",
        "Canberra",
        None,
        Some(false),
        vec![
            EvaluationRun {
                correction_status: Some("SUCCESS".to_string()),
                correction_result: Some(false),
                correction_reason: Some("Sydney is not the capital of Australia".to_string()),
                ..run(1, RunStatus::Succeeded, Some("Sydney"), Some(934), created)
            },
            EvaluationRun {
                correction_status: Some("SUCCESS".to_string()),
                correction_result: Some(true),
                correction_reason: Some("answer matches the reference".to_string()),
                ..run(2, RunStatus::Succeeded, Some("Canberra"), Some(1010), created)
            },
        ],
    );

    // First round of the session: one run timed out, the other saw its
    // correction call fail, so the item cannot be judged.
    let undecidable = EvaluationItem {
        runs: vec![
            EvaluationRun {
                error_code: Some("AGENT_TIMEOUT".to_string()),
                error_message: Some("no response within 30s".to_string()),
                ..run(1, RunStatus::Timeout, None, None, created)
            },
            EvaluationRun {
                correction_status: Some("FAILED".to_string()),
                correction_error_message: Some("judge model returned 503".to_string()),
                correction_retries: Some(3),
                ..run(
                    2,
                    RunStatus::Succeeded,
                    Some("I'd start by checking the order status."),
                    Some(2150),
                    created,
                )
            },
        ],
        ..item(
            "q-dlg-001",
            "A customer reports a missing package. What do you do first?",
            "Look up the order and its tracking state.",
            Some("sess-support-1"),
            Some(false),
            vec![],
        )
    };

    let session_follow_up = item(
        "q-dlg-002",
        "The tracking shows delivery two days ago. Next step?",
        "Open a carrier investigation and offer reshipment or refund.",
        Some("sess-support-1"),
        Some(true),
        vec![
            EvaluationRun {
                correction_status: Some("SUCCESS".to_string()),
                correction_result: Some(true),
                correction_reason: Some("covers the investigation and the remedy".to_string()),
                ..run(
                    1,
                    RunStatus::Succeeded,
                    Some("I would file a carrier claim and offer a replacement."),
                    Some(1688),
                    created,
                )
            },
            EvaluationRun {
                correction_status: Some("SUCCESS".to_string()),
                correction_result: Some(true),
                correction_reason: Some("covers the investigation and the remedy".to_string()),
                ..run(
                    2,
                    RunStatus::Succeeded,
                    Some("Start a trace with the carrier, then refund if unresolved."),
                    Some(1432),
                    created,
                )
            },
        ],
    );

    TaskRecord {
        task: TaskDetails {
            task_id: "demo-001".to_string(),
            task_name: "Support agent benchmark".to_string(),
            status: TaskStatus::Succeeded,
            runs_per_item: 2,
            timeout_seconds: 30,
            enable_correction: true,
            accuracy_rate: None,
            passed_count: None,
            failed_count: None,
            partial_error_count: None,
            correction_failed_count: None,
            total_items: None,
            created_at: Some(created),
            completed_at: Some(completed),
            updated_at: Some(completed),
        },
        progress: TaskProgress {
            processed: 4,
            total: 4,
        },
        items: vec![all_correct, one_incorrect, undecidable, session_follow_up],
    }
}

/// demo-002: still running, results not yet served.
fn demo_running_task(now: DateTime<Utc>) -> TaskRecord {
    let created = now - Duration::minutes(30);
    TaskRecord {
        task: TaskDetails {
            task_id: "demo-002".to_string(),
            task_name: "Nightly regression sweep".to_string(),
            status: TaskStatus::Running,
            runs_per_item: 3,
            timeout_seconds: 60,
            enable_correction: false,
            accuracy_rate: None,
            passed_count: None,
            failed_count: None,
            partial_error_count: None,
            correction_failed_count: None,
            total_items: None,
            created_at: Some(created),
            completed_at: None,
            updated_at: Some(now - Duration::minutes(1)),
        },
        progress: TaskProgress {
            processed: 42,
            total: 120,
        },
        items: Vec::new(),
    }
}

/// demo-003: evaluation aborted partway through.
fn demo_failed_task(now: DateTime<Utc>) -> TaskRecord {
    let created = now - Duration::minutes(20);
    TaskRecord {
        task: TaskDetails {
            task_id: "demo-003".to_string(),
            task_name: "Billing agent smoke test".to_string(),
            status: TaskStatus::Failed,
            runs_per_item: 1,
            timeout_seconds: 30,
            enable_correction: false,
            accuracy_rate: None,
            passed_count: None,
            failed_count: None,
            partial_error_count: None,
            correction_failed_count: None,
            total_items: None,
            created_at: Some(created),
            completed_at: Some(now - Duration::minutes(18)),
            updated_at: Some(now - Duration::minutes(18)),
        },
        progress: TaskProgress {
            processed: 3,
            total: 10,
        },
        items: Vec::new(),
    }
}

/// demo-004: queued, not started.
fn demo_pending_task(now: DateTime<Utc>) -> TaskRecord {
    let created = now - Duration::minutes(10);
    TaskRecord {
        task: TaskDetails {
            task_id: "demo-004".to_string(),
            task_name: "Prompt revision A/B".to_string(),
            status: TaskStatus::Pending,
            runs_per_item: 2,
            timeout_seconds: 30,
            enable_correction: true,
            accuracy_rate: None,
            passed_count: None,
            failed_count: None,
            partial_error_count: None,
            correction_failed_count: None,
            total_items: None,
            created_at: Some(created),
            completed_at: None,
            updated_at: Some(created),
        },
        progress: TaskProgress {
            processed: 0,
            total: 50,
        },
        items: Vec::new(),
    }
}
