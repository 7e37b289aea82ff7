//! # agenteval
//!
//! Result aggregation, verdict classification and CSV export for the agent
//! evaluation platform.
//!
//! An evaluation task runs every question of an uploaded dataset against an
//! agent HTTP API a fixed number of times, optionally judging each response
//! with an automated correction pass. This crate covers the read side of
//! that pipeline: the typed API surface ([`client`]), per-item verdicts and
//! task-level statistics ([`report`]), the paging view state machine
//! ([`view`]), the CSV report ([`export`]), and an in-memory reference
//! server ([`server`]).

pub mod client;
pub mod error;
pub mod export;
pub mod format;
pub mod report;
pub mod server;
pub mod types;
pub mod view;

// Core surface re-exports
pub use client::{EvalApiClient, ResultsApi};
pub use error::ApiError;
pub use report::{
    classify_item, group_by_session, present_page, CorrectionAggregator, CorrectionStats,
    ReportPage, Verdict,
};
pub use view::{ReportPhase, ReportView};

/// Library version, surfaced by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
