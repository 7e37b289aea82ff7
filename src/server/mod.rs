//! HTTP server for the evaluation results API.
//!
//! Serves task registration, the task list, paged results with the
//! aggregated correction summary, and the CSV report download from an
//! in-memory task store.
//!
//! # Endpoints
//!
//! - `GET  /healthz`                             — Liveness probe
//! - `POST /api/v1/evaluation-tasks`             — Register a task
//! - `GET  /api/v1/evaluation-tasks`             — List tasks
//! - `GET  /api/v1/evaluation-tasks/:id/results` — Paged results
//! - `GET  /api/v1/evaluation-tasks/:id/export`  — CSV report

pub mod routes;
pub mod store;

pub use routes::app_router;
pub use store::{AppState, TaskRecord};
