//! agenteval HTTP server binary.
//!
//! Starts an axum HTTP server exposing the evaluation results API, backed
//! by an in-memory task store seeded with demo fixtures.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8080)
//! - `AGENTEVAL_SEED_DEMO` — Set to "0" to start with an empty store
//! - `RUST_LOG` — Tracing filter (default: "info,agenteval=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use agenteval::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,agenteval=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let state = AppState::new();
    if std::env::var("AGENTEVAL_SEED_DEMO").as_deref() != Ok("0") {
        state.seed_demo();
        tracing::info!("seeded demo tasks demo-001..demo-004");
    }

    let app = app_router(state);

    tracing::info!("agenteval server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /healthz                             — liveness probe");
    tracing::info!("  POST /api/v1/evaluation-tasks             — register task");
    tracing::info!("  GET  /api/v1/evaluation-tasks             — list tasks");
    tracing::info!("  GET  /api/v1/evaluation-tasks/:id/results — paged results");
    tracing::info!("  GET  /api/v1/evaluation-tasks/:id/export  — csv report");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
