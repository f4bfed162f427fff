use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::error::ReportError;
use crate::summary::RunSummary;

use super::escape::csv_field;
use super::format_timestamp;

fn write_row(output: &mut String, metric: &str, value: &str) -> Result<(), ReportError> {
    writeln!(output, "{},{}", metric, csv_field(value))
        .map_err(|err| ReportError::Format { source: err })
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

pub(super) fn render_csv(
    summary: &RunSummary,
    generated_at: DateTime<Utc>,
) -> Result<String, ReportError> {
    let overview = summary.overview();
    let metrics = summary.metrics();
    let mut output = String::new();

    write_row(&mut output, "metric", "value")?;
    write_row(&mut output, "environment", &overview.environment)?;
    write_row(&mut output, "base_url", summary.base_url())?;
    write_row(&mut output, "run_at", &format_timestamp(overview.run_at))?;
    write_row(&mut output, "total_steps", &overview.total.to_string())?;
    write_row(&mut output, "passed", &overview.passed.to_string())?;
    write_row(&mut output, "failed", &overview.failed.to_string())?;
    write_row(&mut output, "skipped", &overview.skipped.to_string())?;
    write_row(&mut output, "success_rate", &overview.success_rate.to_string())?;
    write_row(
        &mut output,
        "total_duration_ms",
        &overview.total_duration_ms.to_string(),
    )?;
    write_row(&mut output, "p95_ms", &optional(metrics.p95_ms))?;
    write_row(&mut output, "p99_ms", &optional(metrics.p99_ms))?;
    write_row(&mut output, "load_success_rate", &optional(metrics.success_rate))?;
    write_row(&mut output, "total_requests", &optional(metrics.total_requests))?;
    write_row(&mut output, "generated_at", &format_timestamp(generated_at))?;

    Ok(output)
}
