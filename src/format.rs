//! Display formatting helpers for the results view and export.

use once_cell::sync::Lazy;
use regex::Regex;

static FILENAME_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]+"#).unwrap());

const MAX_FILENAME_LENGTH: usize = 64;
const FALLBACK_FILENAME: &str = "evaluation";

/// Render a run latency as seconds, e.g. `1.43s`.
///
/// One decimal place from 10 seconds upward, two below. Missing latency
/// renders as `-`.
pub fn format_latency_seconds(latency_ms: Option<u64>) -> String {
    let Some(ms) = latency_ms else {
        return "-".to_string();
    };
    let seconds = ms as f64 / 1000.0;
    let places = if seconds >= 10.0 { 1 } else { 2 };
    format!("{seconds:.places$}s")
}

/// Render a task duration in minutes with one decimal place.
///
/// Missing or non-finite values render as `--`, non-positive durations as
/// `0.0`.
pub fn format_duration_minutes(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return "--".to_string();
    };
    if !seconds.is_finite() {
        return "--".to_string();
    }
    if seconds <= 0.0 {
        return "0.0".to_string();
    }
    format!("{:.1}", seconds / 60.0)
}

/// Render an accuracy percentage, e.g. `87.5%`. Missing rates render as the
/// `—` placeholder.
pub fn format_accuracy(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{rate:.1}%"),
        None => "—".to_string(),
    }
}

/// Render an optional counter for the summary line. Missing counters render
/// as `--`.
pub fn format_count(count: Option<u64>) -> String {
    match count {
        Some(count) => count.to_string(),
        None => "--".to_string(),
    }
}

/// Make a task name safe for use as a download filename.
///
/// Runs of characters that are unsafe on common filesystems become a single
/// underscore, outer underscores are stripped, and the result is capped at
/// 64 characters. Names that sanitize to nothing fall back to `evaluation`.
pub fn sanitize_export_filename(name: &str) -> String {
    let base = name.trim();
    let base = if base.is_empty() { FALLBACK_FILENAME } else { base };

    let safe = FILENAME_UNSAFE.replace_all(base, "_");
    let safe = safe.trim_matches('_');
    let safe = if safe.is_empty() { FALLBACK_FILENAME } else { safe };

    match safe.char_indices().nth(MAX_FILENAME_LENGTH) {
        Some((idx, _)) => safe[..idx].to_string(),
        None => safe.to_string(),
    }
}

/// Default filename for a task's CSV report download.
pub fn export_filename(task_name: &str) -> String {
    format!("{}_report.csv", sanitize_export_filename(task_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_latency_two_places_below_ten_seconds() {
        assert_eq!(format_latency_seconds(Some(1432)), "1.43s");
        assert_eq!(format_latency_seconds(Some(0)), "0.00s");
        assert_eq!(format_latency_seconds(Some(9999)), "10.00s");
    }

    #[test]
    fn test_format_latency_one_place_from_ten_seconds() {
        assert_eq!(format_latency_seconds(Some(10_000)), "10.0s");
        assert_eq!(format_latency_seconds(Some(83_500)), "83.5s");
    }

    #[test]
    fn test_format_latency_missing() {
        assert_eq!(format_latency_seconds(None), "-");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration_minutes(Some(90.0)), "1.5");
        assert_eq!(format_duration_minutes(Some(0.0)), "0.0");
        assert_eq!(format_duration_minutes(Some(-5.0)), "0.0");
        assert_eq!(format_duration_minutes(None), "--");
        assert_eq!(format_duration_minutes(Some(f64::NAN)), "--");
    }

    #[test]
    fn test_format_accuracy() {
        assert_eq!(format_accuracy(Some(87.5)), "87.5%");
        assert_eq!(format_accuracy(Some(100.0)), "100.0%");
        assert_eq!(format_accuracy(None), "—");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(Some(42)), "42");
        assert_eq!(format_count(None), "--");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_export_filename("a/b\\c:d*e"), "a_b_c_d_e");
        assert_eq!(sanitize_export_filename("q<>?|uote\"d"), "q_uote_d");
    }

    #[test]
    fn test_sanitize_collapses_runs_and_strips_edges() {
        assert_eq!(sanitize_export_filename("//weekly run//"), "weekly run");
        assert_eq!(sanitize_export_filename("  padded  "), "padded");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_export_filename(""), "evaluation");
        assert_eq!(sanitize_export_filename("   "), "evaluation");
        assert_eq!(sanitize_export_filename("///"), "evaluation");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_export_filename(&long).len(), 64);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("smoke test"), "smoke test_report.csv");
        assert_eq!(export_filename("a/b"), "a_b_report.csv");
        assert_eq!(export_filename(""), "evaluation_report.csv");
    }
}
