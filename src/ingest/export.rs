use serde_json::Value;

use crate::summary::LoadMetrics;

use super::fold::percent_from_x100;
use super::{REQUEST_COUNT_METRIC, REQUEST_DURATION_METRIC, REQUEST_FAILED_METRIC};

/// Extracts metrics from a k6 end-of-test summary document.
///
/// Both the `--summary-export` layout (`metrics.<name>.<stat>`) and the
/// `handleSummary` layout (`metrics.<name>.values.<stat>`) are accepted.
/// Anything absent stays `None`.
#[must_use]
pub fn parse_summary_export(document: &Value) -> LoadMetrics {
    let stat = |metric: &str, key: &str| -> Option<f64> {
        let entry = document.get("metrics")?.get(metric)?;
        let values = entry.get("values").unwrap_or(entry);
        values.get(key).and_then(Value::as_f64)
    };

    let total_requests = stat(REQUEST_COUNT_METRIC, "count").and_then(float_to_count);
    let success_rate = stat(REQUEST_FAILED_METRIC, "rate")
        .or_else(|| stat(REQUEST_FAILED_METRIC, "value"))
        .and_then(success_x100_from_failure_rate)
        .map(percent_from_x100);

    LoadMetrics {
        p95_ms: stat(REQUEST_DURATION_METRIC, "p(95)"),
        p99_ms: stat(REQUEST_DURATION_METRIC, "p(99)"),
        success_rate,
        total_requests,
    }
}

fn float_to_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.round() as u64)
}

#[expect(
    clippy::float_arithmetic,
    reason = "k6 reports counts and rates as JSON floats"
)]
fn success_x100_from_failure_rate(rate: f64) -> Option<u64> {
    (rate.is_finite() && (0.0..=1.0).contains(&rate))
        .then(|| ((1.0 - rate) * 10_000.0).round() as u64)
}
