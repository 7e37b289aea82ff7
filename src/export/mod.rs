//! CSV report building and saving.
//!
//! The export is a flat per-run dump of the whole task: one row per
//! question, `question_id,question,standard_answer` followed by four columns
//! per configured run. It carries no grouping and no verdicts; those exist
//! only in the on-screen report.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::format::export_filename;
use crate::types::{EvaluationItem, EvaluationRun, TaskDetails};

/// Columns emitted per run slot.
const RUN_COLUMNS: usize = 4;

/// Build the CSV document for a task.
///
/// Every row has exactly `3 + 4 * runs_per_item` cells. Runs are matched to
/// their column slot by `run_index`; slots without a matching run stay
/// empty.
pub fn build_csv(task: &TaskDetails, items: &[EvaluationItem]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(header_columns(task.runs_per_item).join(","));
    for item in items {
        lines.push(row_columns(item, task.runs_per_item).join(","));
    }
    let mut csv = lines.join("\n");
    csv.push('\n');
    csv
}

fn header_columns(runs_per_item: u32) -> Vec<String> {
    let mut columns = Vec::with_capacity(3 + RUN_COLUMNS * runs_per_item as usize);
    columns.push("question_id".to_string());
    columns.push("question".to_string());
    columns.push("standard_answer".to_string());
    for i in 1..=runs_per_item {
        columns.push(format!("run_{i}_output"));
        columns.push(format!("run_{i}_status"));
        columns.push(format!("run_{i}_latency_ms"));
        columns.push(format!("run_{i}_error_code"));
    }
    columns
}

fn row_columns(item: &EvaluationItem, runs_per_item: u32) -> Vec<String> {
    let by_index: HashMap<u32, &EvaluationRun> =
        item.runs.iter().map(|run| (run.run_index, run)).collect();

    let mut columns = Vec::with_capacity(3 + RUN_COLUMNS * runs_per_item as usize);
    columns.push(csv_escape(&item.question_id));
    columns.push(csv_escape(&item.question));
    columns.push(csv_escape(&item.standard_answer));

    for i in 1..=runs_per_item {
        match by_index.get(&i) {
            Some(run) => {
                let output = run
                    .response_body
                    .as_deref()
                    .unwrap_or("")
                    .replace("\r\n", "\n");
                columns.push(csv_escape(&output));
                columns.push(run.status.as_str().to_string());
                columns.push(run.latency_ms.map(|ms| ms.to_string()).unwrap_or_default());
                columns.push(csv_escape(run.error_code.as_deref().unwrap_or("")));
            }
            None => {
                for _ in 0..RUN_COLUMNS {
                    columns.push(String::new());
                }
            }
        }
    }
    columns
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Save an exported report under its task-derived filename.
///
/// Returns the full path of the written file.
pub fn save_report(dir: &Path, task_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(export_filename(task_name));
    std::fs::write(&path, bytes)?;
    Ok(path)
}
