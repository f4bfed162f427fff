use super::*;
use crate::error::{AppError, AppResult};
use crate::summary::{LinkKind, LoadMetrics, RunSummary, StepStatus};
use chrono::TimeZone;
use serde_json::json;
use std::future::Future;
use tempfile::tempdir;

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::report(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn sample_summary() -> RunSummary {
    let mut summary = RunSummary::new_at("staging", "https://api.example.com", at(9));
    summary.add_step("submit", StepStatus::Pass, 100, Some(json!({ "id": "abc" })));
    summary.add_step(
        "analytics",
        StepStatus::Fail,
        50,
        Some(json!({ "error": "HTTP 500" })),
    );
    summary.add_step("hmac_submit", StepStatus::Skip, 0, None);
    summary.set_link(LinkKind::ExportCsv, "export_2024-05-01.csv");
    summary
}

#[test]
fn html_contains_rows_overview_and_links() -> Result<(), String> {
    let report = render_at(&sample_summary(), at(10)).map_err(|err| err.to_string())?;
    let expected = [
        r#"<tr class="step-row pass">"#,
        r#"<tr class="step-row fail">"#,
        r#"<tr class="step-row skip">"#,
        "<em>1/3</em>",
        "<em>33.33%</em>",
        "<em>STAGING</em>",
        "<em>150ms</em>",
        r#"<a href="export_2024-05-01.csv" target="_blank">export-csv</a>"#,
        "Generated on 2024-05-01 10:00:00 UTC",
    ];
    for needle in expected {
        if !report.html.contains(needle) {
            return Err(format!("HTML is missing {:?}", needle));
        }
    }
    if report.html.contains("Load Test") {
        return Err("Expected no load-test section without metrics".to_owned());
    }
    Ok(())
}

#[test]
fn free_text_is_escaped() -> Result<(), String> {
    let mut summary =
        RunSummary::new_at("<b>env</b>", "https://x.test/?a=1&b=2", at(9));
    summary.add_step(
        "<img src=x onerror=alert(1)>",
        StepStatus::Pass,
        1,
        Some(json!({ "payload": "<script>alert('x')</script>" })),
    );
    summary.set_link(LinkKind::LoadTestHtml, r#"k6.html" onclick="evil()"#);
    let report = render_at(&summary, at(10)).map_err(|err| err.to_string())?;

    for raw in ["<script>", "<img", "<b>env</b>", r#"" onclick=""#] {
        if report.html.contains(raw) {
            return Err(format!("Unescaped content {:?} in HTML", raw));
        }
    }
    for escaped in [
        "&lt;script&gt;alert(",
        "&lt;img src=x onerror=alert(1)&gt;",
        "a=1&amp;b=2",
        "k6.html&quot; onclick=&quot;evil()",
        "&lt;b&gt;env&lt;",
    ] {
        if !report.html.contains(escaped) {
            return Err(format!("Expected escaped {:?}", escaped));
        }
    }
    Ok(())
}

#[test]
fn empty_summary_renders_placeholder_and_na() -> Result<(), String> {
    let summary = RunSummary::new_at("local", "http://127.0.0.1:3000", at(9));
    let report = render_at(&summary, at(10)).map_err(|err| err.to_string())?;
    if !report.html.contains("No steps recorded") || !report.html.contains("<em>N/A</em>") {
        return Err("Expected empty-run placeholder and N/A".to_owned());
    }
    if report.html.contains(r#"class="artifacts""#) {
        return Err("Expected no artifacts section".to_owned());
    }
    if !report.csv.contains("success_rate,N/A\n") || !report.csv.contains("p95_ms,\n") {
        return Err(format!("Unexpected CSV: {}", report.csv));
    }
    Ok(())
}

#[test]
fn csv_lists_overview_and_metrics() -> Result<(), String> {
    let mut summary = sample_summary();
    summary.add_metrics(&LoadMetrics {
        p95_ms: Some(180.5),
        p99_ms: Some(240.0),
        success_rate: Some(99.5),
        total_requests: Some(1200),
    });
    let report = render_at(&summary, at(10)).map_err(|err| err.to_string())?;
    let expected = "metric,value\n\
environment,staging\n\
base_url,https://api.example.com\n\
run_at,2024-05-01 09:00:00 UTC\n\
total_steps,3\n\
passed,1\n\
failed,1\n\
skipped,1\n\
success_rate,33.33%\n\
total_duration_ms,150\n\
p95_ms,180.5\n\
p99_ms,240\n\
load_success_rate,99.5\n\
total_requests,1200\n\
generated_at,2024-05-01 10:00:00 UTC\n";
    if report.csv != expected {
        return Err(format!("Unexpected CSV:\n{}", report.csv));
    }
    if !report.html.contains("<em>180.50ms</em>") || !report.html.contains("<em>1200</em>") {
        return Err("Expected load-test cards in HTML".to_owned());
    }
    Ok(())
}

#[test]
fn csv_fields_are_quoted_when_needed() -> Result<(), String> {
    let cases = [
        ("plain", "plain"),
        ("a,b", "\"a,b\""),
        ("say \"hi\"", "\"say \"\"hi\"\"\""),
        ("line\nbreak", "\"line\nbreak\""),
    ];
    for (input, expected) in cases {
        if csv_field(input) != expected {
            return Err(format!("Unexpected quoting for {:?}", input));
        }
    }
    Ok(())
}

#[test]
fn rendering_is_deterministic() -> Result<(), String> {
    let summary = sample_summary();
    let first = render_at(&summary, at(10)).map_err(|err| err.to_string())?;
    let second = render_at(&summary, at(10)).map_err(|err| err.to_string())?;
    if first != second {
        return Err("Expected identical output for identical inputs".to_owned());
    }
    Ok(())
}

#[test]
fn only_safe_link_schemes_become_anchors() -> Result<(), String> {
    let mut summary = sample_summary();
    summary.set_link(LinkKind::LoadTestHtml, "javascript:alert(document.cookie)");
    summary.set_link(LinkKind::RawExportJson, "https://bucket.example.com/raw.json");
    let report = render_at(&summary, at(10)).map_err(|err| err.to_string())?;

    if report.html.contains(r#"href="javascript:"#) {
        return Err("javascript: link rendered as an anchor".to_owned());
    }
    if !report.html.contains(r#"<span class="artifact-text">load-test-html: javascript:alert("#) {
        return Err("Expected the unsafe link as plain text".to_owned());
    }
    for needle in [
        r#"<a href="export_2024-05-01.csv" target="_blank">export-csv</a>"#,
        r#"target="_blank">raw-export-json</a>"#,
    ] {
        if !report.html.contains(needle) {
            return Err(format!("HTML is missing {:?}", needle));
        }
    }
    Ok(())
}

#[test]
fn linkable_paths() -> Result<(), String> {
    let cases = [
        ("export.csv", true),
        ("artifacts/k6.json", true),
        ("http://example.com/a", true),
        ("https://example.com/a", true),
        ("file:///tmp/report.html", true),
        ("javascript:alert(1)", false),
        ("  JavaScript:alert(1)", false),
        ("data:text/html,<b>x</b>", false),
    ];
    for (path, expected) in cases {
        if html::is_linkable(path) != expected {
            return Err(format!("Unexpected linkability for {:?}", path));
        }
    }
    Ok(())
}

#[test]
fn write_report_creates_directories() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let html_path = dir.path().join("nested").join("report.html");
        let csv_path = dir.path().join("other").join("report.csv");
        let report = render_at(&sample_summary(), at(10))?;

        write_report(&report, &html_path, Some(&csv_path)).await?;

        let html = tokio::fs::read_to_string(&html_path).await?;
        let csv = tokio::fs::read_to_string(&csv_path).await?;
        if html != report.html || csv != report.csv {
            return Err(AppError::report("Written files differ from the render"));
        }
        Ok(())
    })
}

#[test]
fn write_report_error_names_the_path() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, "file").await?;
        let html_path = blocker.join("report.html");
        let report = render_at(&sample_summary(), at(10))?;

        match write_report(&report, &html_path, None).await {
            Err(err) if err.to_string().contains("blocker") => Ok(()),
            other => Err(AppError::report(format!(
                "Expected a path-bearing error, got {:?}",
                other
            ))),
        }
    })
}
