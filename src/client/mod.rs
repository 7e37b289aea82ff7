//! HTTP client for the evaluation backend.
//!
//! Thin typed wrapper over the REST surface: task creation, task list,
//! per-task results and CSV export. Every failure response is classified
//! into [`ApiError`] before it leaves this module. The results view depends
//! only on the [`ResultsApi`] trait, which keeps it testable without a live
//! backend.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::{
    ApiErrorBody, CreateTaskResponse, ResultsResponse, TaskListResponse, TaskStatus,
};

/// Timeout for list and results fetches.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Extended budget for the export download; CSV generation over a whole
/// task can take noticeably longer than a page fetch.
pub const EXPORT_TIMEOUT_SECS: u64 = 60;
/// Page size used when a query does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Parameters for creating an evaluation task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub task_name: String,
    /// Target agent endpoint the backend will evaluate against.
    pub agent_api_url: String,
    pub dataset_filename: String,
    /// Raw dataset file content, forwarded without inspection.
    pub dataset: Bytes,
    pub enable_correction: bool,
    /// How many times each question is run.
    pub runs_per_item: u32,
    /// Per-invocation timeout the evaluation applies.
    pub timeout_seconds: u64,
}

/// Filters for the task list endpoint.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<TaskStatus>,
    /// Substring match on the task name.
    pub query: Option<String>,
}

/// The fetch surface the results view drives.
#[async_trait]
pub trait ResultsApi: Send + Sync {
    /// Fetch one results page for a task.
    async fn fetch_results(
        &self,
        task_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ResultsResponse, ApiError>;

    /// Download the CSV report for a task.
    async fn export_csv(&self, task_id: &str) -> Result<Bytes, ApiError>;
}

/// reqwest-backed client for the evaluation backend.
#[derive(Debug, Clone)]
pub struct EvalApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl EvalApiClient {
    /// Create a client against a backend base URL, e.g.
    /// `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit a new evaluation task as a multipart form.
    pub async fn create_task(&self, new_task: &NewTask) -> Result<CreateTaskResponse, ApiError> {
        tracing::debug!(task_name = %new_task.task_name, "creating evaluation task");

        let form = multipart::Form::new()
            .text("task_name", new_task.task_name.clone())
            .text("agent_api_url", new_task.agent_api_url.clone())
            .text("enable_correction", new_task.enable_correction.to_string())
            .text("runs_per_item", new_task.runs_per_item.to_string())
            .text("timeout_seconds", new_task.timeout_seconds.to_string())
            .part(
                "dataset_file",
                multipart::Part::bytes(new_task.dataset.to_vec())
                    .file_name(new_task.dataset_filename.clone()),
            );

        let resp = self
            .http
            .post(self.url("/api/v1/evaluation-tasks"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Fetch a page of the task list.
    pub async fn list_tasks(&self, query: &TaskListQuery) -> Result<TaskListResponse, ApiError> {
        let mut params: Vec<(&str, String)> = vec![
            ("page", query.page.unwrap_or(1).to_string()),
            (
                "page_size",
                query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).to_string(),
            ),
        ];
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(q) = &query.query {
            params.push(("query", q.clone()));
        }

        let resp = self
            .http
            .get(self.url("/api/v1/evaluation-tasks"))
            .query(&params)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(Self::classify_failure(resp).await)
        }
    }

    /// Classify a non-success response, reading the `{code, message}` body
    /// when one is present.
    async fn classify_failure(resp: reqwest::Response) -> ApiError {
        let status = resp.status().as_u16();
        let body = resp.json::<ApiErrorBody>().await.ok();
        ApiError::classify(status, body)
    }
}

#[async_trait]
impl ResultsApi for EvalApiClient {
    async fn fetch_results(
        &self,
        task_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ResultsResponse, ApiError> {
        tracing::debug!(task_id, page, page_size, "fetching task results");

        let resp = self
            .http
            .get(self.url(&format!("/api/v1/evaluation-tasks/{task_id}/results")))
            .query(&[("page", page.to_string()), ("page_size", page_size.to_string())])
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn export_csv(&self, task_id: &str) -> Result<Bytes, ApiError> {
        tracing::debug!(task_id, "exporting task results");

        let resp = self
            .http
            .get(self.url(&format!("/api/v1/evaluation-tasks/{task_id}/export")))
            .timeout(Duration::from_secs(EXPORT_TIMEOUT_SECS))
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(resp.bytes().await?)
        } else {
            Err(Self::classify_failure(resp).await)
        }
    }
}
