//! Results view orchestration.
//!
//! Owns the loading/error state of the report view and drives page
//! fetches. Phases move `Idle -> Loading -> {Ready, NotFinished, Failed}`;
//! both failure phases keep the view interactive and are left via an
//! explicit retry that re-issues the same request.
//!
//! Overlapping fetches are resolved with a generation token: every fetch is
//! tagged with a monotonically increasing sequence number at issuance, and
//! a completion that is not the latest issued is discarded regardless of
//! arrival order. A slow page-1 response can therefore never overwrite an
//! already-rendered page 2.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::client::{ResultsApi, DEFAULT_PAGE_SIZE};
use crate::error::ApiError;
use crate::report::{present_page, ReportPage};

/// Soft warning shown when the task exists but has not finished.
pub const NOT_FINISHED_MESSAGE: &str = "task has not finished yet, check back shortly";
/// Generic message for every other load failure.
pub const LOAD_FAILED_MESSAGE: &str = "failed to load results, please retry";

/// Phase of the results view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportPhase {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The current page rendered successfully.
    Ready,
    /// The task has not finished; retryable, rendered as a warning rather
    /// than an error banner.
    NotFinished { message: String },
    /// Any other failure; retryable.
    Failed { message: String },
}

#[derive(Debug)]
struct ViewState {
    phase: ReportPhase,
    page: u32,
    report: Option<ReportPage>,
}

/// State container for one task's results view.
///
/// Each view owns its fetched snapshot exclusively; nothing here is shared
/// with other views.
pub struct ReportView {
    api: Arc<dyn ResultsApi>,
    task_id: String,
    page_size: u32,
    state: RwLock<ViewState>,
    generation: AtomicU64,
}

impl ReportView {
    pub fn new(api: Arc<dyn ResultsApi>, task_id: impl Into<String>) -> Self {
        Self {
            api,
            task_id: task_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            state: RwLock::new(ViewState {
                phase: ReportPhase::Idle,
                page: 1,
                report: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn phase(&self) -> ReportPhase {
        self.state.read().phase.clone()
    }

    /// 1-based page the view currently targets.
    pub fn page(&self) -> u32 {
        self.state.read().page
    }

    /// The last successfully rendered report, if any. Kept on screen while
    /// a newer page loads.
    pub fn report(&self) -> Option<ReportPage> {
        self.state.read().report.clone()
    }

    /// Fetch and render one page.
    ///
    /// Used for the initial load, pagination, and programmatic navigation
    /// restoring a page number. Concurrent calls are safe; only the latest
    /// issued request may commit its result.
    pub async fn load_page(&self, page: u32) {
        let my_generation = {
            let mut state = self.state.write();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.phase = ReportPhase::Loading;
            state.page = page;
            generation
        };

        let result = self
            .api
            .fetch_results(&self.task_id, page, self.page_size)
            .await;

        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != my_generation {
            tracing::debug!(
                task_id = %self.task_id,
                page,
                generation = my_generation,
                "discarding stale results fetch"
            );
            return;
        }

        match result {
            Ok(response) => {
                state.report = Some(present_page(&response));
                state.page = page;
                state.phase = ReportPhase::Ready;
            }
            Err(err) if err.is_not_finished() => {
                tracing::info!(task_id = %self.task_id, %err, "task not finished");
                state.phase = ReportPhase::NotFinished {
                    message: NOT_FINISHED_MESSAGE.to_string(),
                };
            }
            Err(err) => {
                tracing::warn!(task_id = %self.task_id, page, %err, "results fetch failed");
                state.phase = ReportPhase::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
            }
        }
    }

    /// Re-issue the request for the current page.
    ///
    /// The retry affordance of both failure phases; identical to the request
    /// that failed.
    pub async fn retry(&self) {
        let page = self.page();
        self.load_page(page).await;
    }

    /// Download the CSV report for this task.
    ///
    /// Independent of the page state machine: a failed export leaves the
    /// rendered page untouched and surfaces only through the returned
    /// error.
    pub async fn export(&self) -> Result<Bytes, ApiError> {
        self.api.export_csv(&self.task_id).await
    }
}
