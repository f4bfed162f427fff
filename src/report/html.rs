use chrono::{DateTime, Utc};
use minijinja::{Environment, context};
use serde::Serialize;
use url::Url;

use crate::error::ReportError;
use crate::summary::{LoadMetrics, RunSummary, StepResult};

use super::format_timestamp;

// The `.html` name turns on minijinja's HTML auto-escaping.
const TEMPLATE_NAME: &str = "report.html";

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>API Test Report - {{ overview.env }}</title>
  <style>
{% raw %}    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; background: #f5f5f5; padding: 20px; }
    .container { max-width: 1200px; margin: 0 auto; background: white; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); padding: 30px; }
    h1 { font-size: 2em; margin-bottom: 10px; color: #333; }
    h2 { font-size: 1.3em; margin: 30px 0 20px; }
    .header-meta, .summary, .load-metrics { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 15px; margin-bottom: 30px; }
    .meta-card { background: #f9f9f9; padding: 15px; border-radius: 6px; border-left: 4px solid #6d28d9; }
    .summary-card { background: #f9f9f9; padding: 20px; border-radius: 6px; text-align: center; border-top: 3px solid #ccc; }
    .summary-card.passed { border-top-color: #10b981; }
    .summary-card.failed { border-top-color: #ef4444; }
    .summary-card.skipped { border-top-color: #f59e0b; }
    .meta-card strong, .summary-card strong { display: block; color: #666; font-size: 0.85em; margin-bottom: 5px; }
    .meta-card em, .summary-card em { display: block; font-style: normal; color: #333; font-size: 1.3em; word-break: break-all; }
    table { width: 100%; border-collapse: collapse; margin-bottom: 30px; }
    th { background: #f9f9f9; border-bottom: 2px solid #ddd; padding: 12px; text-align: left; font-weight: 600; }
    td { padding: 12px; border-bottom: 1px solid #eee; }
    tr.step-row.pass { background: #f0fdf4; }
    tr.step-row.fail { background: #fef2f2; }
    tr.step-row.skip { background: #fffbeb; }
    .step-status { font-weight: bold; }
    .step-status.pass { color: #10b981; }
    .step-status.fail { color: #ef4444; }
    .step-status.skip { color: #d97706; }
    .step-ms { font-variant-numeric: tabular-nums; }
    .step-info { font-size: 0.85em; color: #666; word-break: break-all; }
    .artifacts { background: #f9f9f9; padding: 20px; border-radius: 6px; margin-bottom: 30px; }
    .artifacts a { color: #6d28d9; text-decoration: none; margin-right: 15px; }
    .footer { text-align: center; color: #999; font-size: 0.85em; border-top: 1px solid #eee; padding-top: 20px; }{% endraw %}
  </style>
</head>
<body>
  <div class="container">
    <h1>API Test Report</h1>
    <div class="header-meta">
{%- for card in meta %}
      <div class="meta-card"><strong>{{ card.label }}</strong><em>{{ card.value }}</em></div>
{%- endfor %}
    </div>
    <div class="summary">
      <div class="summary-card passed"><strong>Passed</strong><em>{{ overview.passed }}/{{ overview.total }}</em></div>
      <div class="summary-card failed"><strong>Failed</strong><em>{{ overview.failed }}/{{ overview.total }}</em></div>
      <div class="summary-card skipped"><strong>Skipped</strong><em>{{ overview.skipped }}/{{ overview.total }}</em></div>
      <div class="summary-card"><strong>Success Rate</strong><em>{{ overview.success_rate }}</em></div>
    </div>
{%- if load_metrics %}
    <h2>Load Test</h2>
    <div class="load-metrics">
{%- for card in load_metrics %}
      <div class="meta-card"><strong>{{ card.label }}</strong><em>{{ card.value }}</em></div>
{%- endfor %}
    </div>
{%- endif %}
    <h2>Test Steps</h2>
    <table>
      <thead>
        <tr><th>Step Name</th><th>Status</th><th>Duration</th><th>Details</th></tr>
      </thead>
      <tbody>
{%- for step in steps %}
        <tr class="step-row {{ step.class }}">
          <td class="step-name">{{ step.name }}</td>
          <td class="step-status {{ step.class }}">{{ step.status }}</td>
          <td class="step-ms">{{ step.duration_ms }}ms</td>
          <td class="step-info">{{ step.info }}</td>
        </tr>
{%- else %}
        <tr><td colspan="4">No steps recorded</td></tr>
{%- endfor %}
      </tbody>
    </table>
{%- if links %}
    <div class="artifacts">
      <h2>Artifacts</h2>
      {% for link in links %}{% if not loop.first %} | {% endif %}{% if link.href %}<a href="{{ link.href }}" target="_blank">{{ link.kind }}</a>{% else %}<span class="artifact-text">{{ link.kind }}: {{ link.path }}</span>{% endif %}{% endfor %}
    </div>
{%- endif %}
    <div class="footer">
      <p>End-to-End API Test Report | Generated on {{ generated_at }}</p>
    </div>
  </div>
</body>
</html>
"#;

#[derive(Serialize)]
struct Card {
    label: &'static str,
    value: String,
}

impl Card {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Serialize)]
struct StepRow<'summary> {
    name: &'summary str,
    status: &'static str,
    class: &'static str,
    duration_ms: u64,
    info: String,
}

impl<'summary> From<&'summary StepResult> for StepRow<'summary> {
    fn from(step: &'summary StepResult) -> Self {
        Self {
            name: &step.name,
            status: step.status.as_str(),
            class: step.status.css_class(),
            duration_ms: step.duration_ms,
            info: step.info.to_string(),
        }
    }
}

#[derive(Serialize)]
struct LinkRow<'summary> {
    kind: &'static str,
    path: &'summary str,
    /// Set only when the path is safe to render as an anchor.
    href: Option<&'summary str>,
}

/// Relative paths and `http`, `https` or `file` URLs. Anything else
/// (`javascript:`, `data:`, unparsable URLs) is shown as text.
pub(super) fn is_linkable(path: &str) -> bool {
    match Url::parse(path) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "file"),
        Err(err) => err == url::ParseError::RelativeUrlWithoutBase,
    }
}

fn template_error(err: minijinja::Error) -> ReportError {
    ReportError::Template { source: err }
}

pub(super) fn render_html(
    summary: &RunSummary,
    generated_at: DateTime<Utc>,
) -> Result<String, ReportError> {
    let overview = summary.overview();
    let meta = vec![
        Card::new("Environment", overview.environment.to_uppercase()),
        Card::new("Base URL", summary.base_url()),
        Card::new("Run Time", format_timestamp(overview.run_at)),
        Card::new("Total Duration", format!("{}ms", overview.total_duration_ms)),
    ];
    let steps: Vec<StepRow<'_>> = summary.steps().iter().map(StepRow::from).collect();
    let links: Vec<LinkRow<'_>> = summary
        .links()
        .iter()
        .map(|(kind, path)| LinkRow {
            kind: kind.as_str(),
            path,
            href: is_linkable(path).then_some(path),
        })
        .collect();

    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, REPORT_TEMPLATE)
        .map_err(template_error)?;
    let template = env.get_template(TEMPLATE_NAME).map_err(template_error)?;
    template
        .render(context! {
            overview => overview,
            meta => meta,
            load_metrics => load_metric_cards(summary.metrics()),
            steps => steps,
            links => links,
            generated_at => format_timestamp(generated_at),
        })
        .map_err(template_error)
}

fn load_metric_cards(metrics: &LoadMetrics) -> Vec<Card> {
    if metrics.is_empty() {
        return Vec::new();
    }
    let show = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_owned());
    vec![
        Card::new("p95", show(metrics.p95_ms.map(|ms| format!("{:.2}ms", ms)))),
        Card::new("p99", show(metrics.p99_ms.map(|ms| format!("{:.2}ms", ms)))),
        Card::new(
            "Success Rate",
            show(metrics.success_rate.map(|rate| format!("{:.2}%", rate))),
        ),
        Card::new(
            "Total Requests",
            show(metrics.total_requests.map(|total| total.to_string())),
        ),
    ]
}
