//! HTML and CSV rendering of a run summary.
mod csv;
mod escape;
mod html;
mod writer;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};

use crate::error::ReportError;
use crate::summary::RunSummary;

pub use escape::csv_field;
pub use writer::write_report;

/// Both report documents for one summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub html: String,
    pub csv: String,
}

/// Renders `summary` stamped with the current time.
///
/// # Errors
///
/// Returns an error if the HTML template or the CSV buffer fails to render.
pub fn render(summary: &RunSummary) -> Result<RenderedReport, ReportError> {
    render_at(summary, Utc::now())
}

/// Renders `summary` with an explicit "generated at" time. The output
/// depends only on the inputs.
///
/// # Errors
///
/// Returns an error if the HTML template or the CSV buffer fails to render.
pub fn render_at(
    summary: &RunSummary,
    generated_at: DateTime<Utc>,
) -> Result<RenderedReport, ReportError> {
    Ok(RenderedReport {
        html: html::render_html(summary, generated_at)?,
        csv: csv::render_csv(summary, generated_at)?,
    })
}

pub(crate) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
