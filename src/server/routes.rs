//! Axum route handlers for the evaluation results API.
//!
//! # Routes
//!
//! - `GET  /healthz`                                  — Liveness probe
//! - `POST /api/v1/evaluation-tasks`                  — Register a task (multipart)
//! - `GET  /api/v1/evaluation-tasks`                  — List tasks, filterable
//! - `GET  /api/v1/evaluation-tasks/:id/results`      — Paged results for one task
//! - `GET  /api/v1/evaluation-tasks/:id/export`       — CSV report download
//!
//! Every failure response carries a `{ "code", "message" }` body; the codes
//! are the stable identifiers from [`crate::error::codes`]. Results and
//! export are only served once a task reached SUCCEEDED, anything earlier
//! (including FAILED) answers `409 TASK_NOT_FINISHED`.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::client::DEFAULT_PAGE_SIZE;
use crate::error::codes;
use crate::export;
use crate::format;
use crate::report::CorrectionAggregator;
use crate::server::store::{AppState, TaskRecord};
use crate::types::{
    CreateTaskResponse, EvaluationItem, EvaluationTask, Pagination, ResultsResponse,
    TaskDetails, TaskListResponse, TaskProgress, TaskStatus,
};

/// Upper bound on `page_size` for both list endpoints.
const MAX_PAGE_SIZE: u32 = 100;
/// Upper bound on dataset uploads.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Runs per question applied when task creation does not choose one.
pub const DEFAULT_RUNS_PER_ITEM: u32 = 5;
/// Upper bound on runs per question accepted at task creation.
pub const MAX_RUNS_PER_ITEM: u32 = 10;
/// Dataset row cap enforced by the evaluation worker at ingest.
pub const MAX_DATASET_ROWS: u64 = 1000;

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route(
            "/api/v1/evaluation-tasks",
            get(list_tasks_handler).post(create_task_handler),
        )
        .route(
            "/api/v1/evaluation-tasks/:task_id/results",
            get(results_handler),
        )
        .route(
            "/api/v1/evaluation-tasks/:task_id/export",
            get(export_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_error(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(serde_json::json!({
            "code": code,
            "message": message.into(),
        })),
    )
}

/// Look up a task and enforce the finished gate shared by results and
/// export.
fn finished_task(
    state: &AppState,
    task_id: &str,
) -> Result<TaskRecord, (StatusCode, Json<Value>)> {
    let record = state.get(task_id).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            codes::TASK_NOT_FOUND,
            format!("task '{task_id}' does not exist"),
        )
    })?;
    if !record.task.status.is_finished() {
        return Err(api_error(
            StatusCode::CONFLICT,
            codes::TASK_NOT_FINISHED,
            "results are available once the task has finished successfully",
        ));
    }
    Ok(record)
}

/// GET /healthz — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "agenteval",
    }))
}

// ---------------------------------------------------------------------------
// Task creation and listing
// ---------------------------------------------------------------------------

/// POST /api/v1/evaluation-tasks — register a new evaluation task.
///
/// Accepts a multipart form with `task_name`, `agent_api_url`,
/// `dataset_file` (required) and `enable_correction`, `runs_per_item`,
/// `timeout_seconds` (optional). The dataset is handed to the evaluation
/// worker out of band, which parses it and enforces [`MAX_DATASET_ROWS`];
/// this service only registers the task as PENDING and answers 201 with
/// the assigned id.
async fn create_task_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateTaskResponse>), (StatusCode, Json<Value>)> {
    let mut task_name: Option<String> = None;
    let mut agent_api_url: Option<String> = None;
    let mut enable_correction = false;
    let mut runs_per_item: u32 = DEFAULT_RUNS_PER_ITEM;
    let mut timeout_seconds: u64 = 30;
    let mut dataset: Option<(String, usize)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION_ERROR,
            format!("malformed multipart body: {err}"),
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "task_name" => task_name = Some(field_text(field, &name).await?),
            "agent_api_url" => agent_api_url = Some(field_text(field, &name).await?),
            "enable_correction" => {
                enable_correction = field_text(field, &name).await?.trim() == "true";
            }
            "runs_per_item" => {
                runs_per_item = parse_field(field_text(field, &name).await?.trim(), &name)?;
            }
            "timeout_seconds" => {
                timeout_seconds = parse_field(field_text(field, &name).await?.trim(), &name)?;
            }
            "dataset_file" => {
                let filename = field.file_name().unwrap_or("dataset.csv").to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    api_error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        codes::VALIDATION_ERROR,
                        format!("unreadable dataset upload: {err}"),
                    )
                })?;
                dataset = Some((filename, bytes.len()));
            }
            _ => {}
        }
    }

    let task_name = task_name
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| missing_field("task_name"))?;
    let agent_api_url = agent_api_url
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| missing_field("agent_api_url"))?;
    let (dataset_name, dataset_bytes) = dataset.ok_or_else(|| missing_field("dataset_file"))?;
    if runs_per_item == 0 || runs_per_item > MAX_RUNS_PER_ITEM {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION_ERROR,
            format!("runs_per_item must be between 1 and {MAX_RUNS_PER_ITEM}"),
        ));
    }
    if timeout_seconds == 0 {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION_ERROR,
            "timeout_seconds must be at least 1",
        ));
    }

    let task_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    tracing::info!(
        task_id = %task_id,
        task_name = %task_name,
        agent_api_url = %agent_api_url,
        dataset = %dataset_name,
        dataset_bytes,
        enable_correction,
        "registered evaluation task"
    );
    state.insert(TaskRecord {
        task: TaskDetails {
            task_id: task_id.clone(),
            task_name,
            status: TaskStatus::Pending,
            runs_per_item,
            timeout_seconds,
            enable_correction,
            accuracy_rate: None,
            passed_count: None,
            failed_count: None,
            partial_error_count: None,
            correction_failed_count: None,
            total_items: None,
            created_at: Some(now),
            completed_at: None,
            updated_at: Some(now),
        },
        progress: TaskProgress::default(),
        items: Vec::new(),
    });

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            task_id,
            status: TaskStatus::Pending,
            enable_correction,
        }),
    ))
}

async fn field_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, (StatusCode, Json<Value>)> {
    field.text().await.map_err(|err| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION_ERROR,
            format!("unreadable field '{name}': {err}"),
        )
    })
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    name: &str,
) -> Result<T, (StatusCode, Json<Value>)> {
    raw.parse().map_err(|_| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION_ERROR,
            format!("field '{name}' is not a valid number"),
        )
    })
}

fn missing_field(name: &str) -> (StatusCode, Json<Value>) {
    api_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        codes::VALIDATION_ERROR,
        format!("required field '{name}' is missing"),
    )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    query: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn parse_status_filter(raw: &str) -> Option<TaskStatus> {
    match raw {
        "PENDING" => Some(TaskStatus::Pending),
        "RUNNING" => Some(TaskStatus::Running),
        "SUCCEEDED" => Some(TaskStatus::Succeeded),
        "FAILED" => Some(TaskStatus::Failed),
        _ => None,
    }
}

/// GET /api/v1/evaluation-tasks — paged task list, newest first.
///
/// `status` filters by lifecycle state and rejects unknown values with
/// `422 INVALID_STATUS_FILTER`; `query` filters by name substring.
async fn list_tasks_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TaskListResponse>, (StatusCode, Json<Value>)> {
    let status_filter = match query.status.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => Some(parse_status_filter(raw).ok_or_else(|| {
            api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                codes::INVALID_STATUS_FILTER,
                format!("unknown status '{raw}', expected PENDING, RUNNING, SUCCEEDED or FAILED"),
            )
        })?),
    };

    let mut rows = state.summaries();
    if let Some(status) = status_filter {
        rows.retain(|task| task.status == status);
    }
    if let Some(needle) = query.query.as_deref().filter(|s| !s.is_empty()) {
        rows.retain(|task| task.task_name.contains(needle));
    }

    let total = rows.len() as u64;
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
    let start = ((page - 1) as usize).saturating_mul(page_size as usize);
    let items: Vec<EvaluationTask> = rows
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    Ok(Json(TaskListResponse {
        items,
        pagination: Pagination {
            page,
            page_size,
            total,
        },
    }))
}

// ---------------------------------------------------------------------------
// Results and export
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

/// GET /api/v1/evaluation-tasks/:id/results — one page of results.
///
/// The correction summary is aggregated over the whole task on every
/// request, not over the returned page, so the counters and per-item
/// verdicts are identical on every page. Runs come back ordered by
/// `run_index`.
async fn results_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ResultsResponse>, (StatusCode, Json<Value>)> {
    let record = finished_task(&state, &task_id)?;

    let mut task = record.task.clone();
    let mut items = record.items.clone();
    for item in &mut items {
        item.runs.sort_by_key(|run| run.run_index);
    }

    let total = items.len() as u64;
    task.total_items = Some(total);

    if task.enable_correction {
        let mut aggregator = CorrectionAggregator::new();
        for item in &items {
            aggregator.observe_item(item);
        }
        for item in &mut items {
            item.failure_type = aggregator.failure_type(&item.question_id);
        }
        let stats = aggregator.stats();
        task.passed_count = Some(stats.passed);
        task.failed_count = Some(stats.failed_total());
        task.partial_error_count = Some(stats.partial_error_count);
        task.correction_failed_count = Some(stats.correction_failed_count);
        task.accuracy_rate = Some(stats.accuracy_rate());
    } else {
        if task.passed_count.is_none() {
            task.passed_count =
                Some(items.iter().filter(|i| i.is_passed == Some(true)).count() as u64);
        }
        if task.failed_count.is_none() {
            task.failed_count = task.passed_count.map(|passed| total.saturating_sub(passed));
        }
    }

    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
    let start = ((page - 1) as usize).saturating_mul(page_size as usize);
    let page_items: Vec<EvaluationItem> = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    Ok(Json(ResultsResponse {
        task,
        items: page_items,
        pagination: Pagination {
            page,
            page_size,
            total,
        },
    }))
}

/// GET /api/v1/evaluation-tasks/:id/export — CSV report download.
///
/// Same gates as the results endpoint. The body is the fixed-width report
/// of [`crate::export::build_csv`]; the filename derives from the task
/// name.
async fn export_handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let record = finished_task(&state, &task_id)?;

    let csv = export::build_csv(&record.task, &record.items);
    let filename = format::export_filename(&record.task.task_name);
    tracing::debug!(task_id = %task_id, filename = %filename, bytes = csv.len(), "serving csv export");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    const BOUNDARY: &str = "agenteval-test-boundary";

    fn seeded_app() -> Router {
        let state = AppState::new();
        state.seed_demo();
        app_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn multipart_body(fields: &[(&str, &str)], with_dataset: bool) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        if with_dataset {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"dataset_file\"; \
                 filename=\"dataset.csv\"\r\nContent-Type: text/csv\r\n\r\n\
                 question,standard_answer\nWhat is 2+2?,4\n\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn multipart_request(fields: &[(&str, &str)], with_dataset: bool) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/evaluation-tasks")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, with_dataset)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = seeded_app().oneshot(get("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "agenteval");
    }

    #[tokio::test]
    async fn test_results_unknown_task_is_404() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks/no-such-task/results"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["code"], codes::TASK_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_results_running_task_is_409() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks/demo-002/results"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["code"], codes::TASK_NOT_FINISHED);
    }

    #[tokio::test]
    async fn test_results_failed_task_is_also_409() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks/demo-003/results"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_results_aggregate_correction_summary() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks/demo-001/results"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["task"]["enable_correction"], true);
        assert_eq!(json["task"]["total_items"], 4);
        assert_eq!(json["task"]["passed_count"], 2);
        assert_eq!(json["task"]["failed_count"], 2);
        assert_eq!(json["task"]["partial_error_count"], 1);
        assert_eq!(json["task"]["correction_failed_count"], 1);
        assert_eq!(json["task"]["accuracy_rate"], 50.0);

        let verdicts: Vec<&str> = json["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["failure_type"].as_str().unwrap())
            .collect();
        assert_eq!(
            verdicts,
            vec!["PASS", "PARTIAL_ERROR", "CORRECTION_FAILED", "PASS"]
        );
    }

    #[tokio::test]
    async fn test_results_runs_are_ordered_by_run_index() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks/demo-001/results"))
            .await
            .unwrap();
        let json = body_json(response).await;

        for item in json["items"].as_array().unwrap() {
            let indices: Vec<u64> = item["runs"]
                .as_array()
                .unwrap()
                .iter()
                .map(|run| run["run_index"].as_u64().unwrap())
                .collect();
            assert_eq!(indices, vec![1, 2]);
        }
    }

    #[tokio::test]
    async fn test_results_pages_items_but_aggregates_whole_task() {
        let response = seeded_app()
            .oneshot(get(
                "/api/v1/evaluation-tasks/demo-001/results?page=2&page_size=2",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let items = json["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["question_id"], "q-dlg-001");
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["total"], 4);
        // Counters cover all four items, not just this page.
        assert_eq!(json["task"]["passed_count"], 2);
        assert_eq!(json["task"]["partial_error_count"], 1);
    }

    #[tokio::test]
    async fn test_list_tasks_newest_first() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let ids: Vec<&str> = json["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|task| task["task_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["demo-004", "demo-003", "demo-002", "demo-001"]);
        assert_eq!(json["pagination"]["total"], 4);
        assert_eq!(json["pagination"]["page_size"], 20);
    }

    #[tokio::test]
    async fn test_list_tasks_filters_by_status() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks?status=SUCCEEDED"))
            .await
            .unwrap();
        let json = body_json(response).await;

        let items = json["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["task_id"], "demo-001");
        assert_eq!(items[0]["progress"]["processed"], 4);
    }

    #[tokio::test]
    async fn test_list_tasks_rejects_unknown_status() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks?status=DONE"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["code"], codes::INVALID_STATUS_FILTER);
        assert!(json["message"].as_str().unwrap().contains("DONE"));
    }

    #[tokio::test]
    async fn test_list_tasks_filters_by_name_substring() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks?query=Billing"))
            .await
            .unwrap();
        let json = body_json(response).await;

        let items = json["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["task_id"], "demo-003");
    }

    #[tokio::test]
    async fn test_create_task_registers_pending() {
        let state = AppState::new();
        let app = app_router(state.clone());

        let request = multipart_request(
            &[
                ("task_name", "Checkout flow eval"),
                ("agent_api_url", "http://localhost:9000/chat"),
                ("enable_correction", "true"),
                ("runs_per_item", "3"),
            ],
            true,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["enable_correction"], true);
        let task_id = json["task_id"].as_str().unwrap();

        let record = state.get(task_id).unwrap();
        assert_eq!(record.task.task_name, "Checkout flow eval");
        assert_eq!(record.task.runs_per_item, 3);
        assert_eq!(record.task.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_task_requires_dataset() {
        let request = multipart_request(
            &[
                ("task_name", "No dataset"),
                ("agent_api_url", "http://localhost:9000/chat"),
            ],
            false,
        );
        let response = seeded_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["code"], codes::VALIDATION_ERROR);
        assert!(json["message"].as_str().unwrap().contains("dataset_file"));
    }

    #[tokio::test]
    async fn test_create_task_rejects_excessive_runs() {
        let request = multipart_request(
            &[
                ("task_name", "Too many runs"),
                ("agent_api_url", "http://localhost:9000/chat"),
                ("runs_per_item", "11"),
            ],
            true,
        );
        let response = seeded_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_export_serves_csv_attachment() {
        let response = seeded_app()
            .oneshot(get("/api/v1/evaluation-tasks/demo-001/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Support agent benchmark_report.csv\""
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let header_line = csv.lines().next().unwrap();
        // Three fixed columns plus four per run, two runs per item.
        assert_eq!(header_line.split(',').count(), 11);
        assert!(header_line.starts_with("question_id,question,standard_answer"));
    }

    #[tokio::test]
    async fn test_export_gates_match_results() {
        let app = seeded_app();

        let running = app
            .clone()
            .oneshot(get("/api/v1/evaluation-tasks/demo-002/export"))
            .await
            .unwrap();
        assert_eq!(running.status(), StatusCode::CONFLICT);

        let unknown = app
            .oneshot(get("/api/v1/evaluation-tasks/no-such-task/export"))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }
}
