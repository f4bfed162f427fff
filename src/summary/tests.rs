use super::*;
use crate::error::{AppError, AppResult};
use chrono::{TimeZone, Utc};
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
        .map_err(|err| AppError::summary(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

fn fixed_summary() -> RunSummary {
    let run_at = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
        .single()
        .unwrap_or_else(Utc::now);
    RunSummary::new_at("local", "http://127.0.0.1:3000", run_at)
}

#[test]
fn create_starts_empty() -> Result<(), String> {
    let summary = RunSummary::new("prod", "https://api.example.com");
    if !summary.steps().is_empty() {
        return Err("Expected no steps".to_owned());
    }
    if !summary.metrics().is_empty() {
        return Err("Expected all metrics unset".to_owned());
    }
    if summary.links().iter().next().is_some() {
        return Err("Expected all links unset".to_owned());
    }
    if summary.environment() != "prod" || summary.base_url() != "https://api.example.com" {
        return Err("Unexpected run parameters".to_owned());
    }
    Ok(())
}

#[test]
fn overview_matches_submit_then_analytics_run() -> Result<(), String> {
    let mut summary = fixed_summary();
    summary.add_step("submit", StepStatus::Pass, 120, Some(json!({ "id": "abc" })));
    summary.add_step("analytics", StepStatus::Fail, 30, Some(json!({ "error": "404" })));

    let overview = summary.overview();
    if overview.total != 2 || overview.passed != 1 || overview.failed != 1 {
        return Err(format!("Unexpected counts: {:?}", overview));
    }
    if overview.success_rate.to_string() != "50.00%" {
        return Err(format!("Unexpected success rate: {}", overview.success_rate));
    }
    if overview.total_duration_ms != 150 {
        return Err(format!(
            "Unexpected total duration: {}",
            overview.total_duration_ms
        ));
    }
    Ok(())
}

#[test]
fn overview_on_empty_run_is_not_applicable() -> Result<(), String> {
    let overview = fixed_summary().overview();
    if overview.success_rate != SuccessRate::NotApplicable {
        return Err(format!("Expected N/A, got {}", overview.success_rate));
    }
    if overview.success_rate.to_string() != "N/A" {
        return Err("Unexpected N/A rendering".to_owned());
    }
    if overview.total != 0 || overview.total_duration_ms != 0 {
        return Err("Expected zero totals".to_owned());
    }
    Ok(())
}

#[test]
fn overview_counts_track_every_append() -> Result<(), String> {
    let mut summary = fixed_summary();
    let statuses = [
        StepStatus::Pass,
        StepStatus::Fail,
        StepStatus::Pass,
        StepStatus::Pass,
        StepStatus::Fail,
        StepStatus::Pass,
        StepStatus::Pass,
    ];
    for (idx, status) in statuses.iter().enumerate() {
        summary.add_step(format!("step-{}", idx), *status, 10, None);
        let overview = summary.overview();
        if overview.total != summary.steps().len() {
            return Err("total must equal step count".to_owned());
        }
        if overview.passed + overview.failed != overview.total {
            return Err("passed + failed must equal total".to_owned());
        }
    }
    let rate = summary.overview().success_rate;
    // 5 of 7 = 71.428..%
    if rate != (SuccessRate::Percent { x100: 7143 }) {
        return Err(format!("Unexpected rounding: {}", rate));
    }
    Ok(())
}

#[test]
fn skipped_steps_are_counted_separately() -> Result<(), String> {
    let mut summary = fixed_summary();
    summary.add_step("submit", StepStatus::Pass, 5, None);
    summary.add_step("hmac_submit", StepStatus::Skip, 0, None);
    let overview = summary.overview();
    if overview.skipped != 1 || overview.total != 2 || overview.failed != 0 {
        return Err(format!("Unexpected counts: {:?}", overview));
    }
    if overview.success_rate.to_string() != "50.00%" {
        return Err(format!("Unexpected success rate: {}", overview.success_rate));
    }
    Ok(())
}

#[test]
fn steps_keep_insertion_order_and_allow_repeats() -> Result<(), String> {
    let mut summary = fixed_summary();
    summary.add_step("submit", StepStatus::Fail, 1, None);
    summary.add_step("submit", StepStatus::Pass, 2, None);
    summary.add_step("export", StepStatus::Pass, 3, None);
    let names: Vec<(&str, u64)> = summary
        .steps()
        .iter()
        .map(|step| (step.name.as_str(), step.duration_ms))
        .collect();
    if names != vec![("submit", 1), ("submit", 2), ("export", 3)] {
        return Err(format!("Unexpected order: {:?}", names));
    }
    let first = summary.steps().first().ok_or("missing first step")?;
    if first.info != json!({}) {
        return Err("Missing info should default to an empty object".to_owned());
    }
    Ok(())
}

#[test]
fn add_metrics_copies_only_set_fields() -> Result<(), String> {
    let mut summary = fixed_summary();
    summary.add_metrics(&LoadMetrics {
        p95_ms: Some(120.5),
        total_requests: Some(40),
        ..LoadMetrics::default()
    });
    summary.add_metrics(&LoadMetrics {
        p99_ms: Some(300.0),
        ..LoadMetrics::default()
    });
    let metrics = summary.metrics();
    if metrics.p95_ms != Some(120.5) || metrics.p99_ms != Some(300.0) {
        return Err(format!("Unexpected percentiles: {:?}", metrics));
    }
    if metrics.total_requests != Some(40) || metrics.success_rate.is_some() {
        return Err(format!("Unexpected counters: {:?}", metrics));
    }
    Ok(())
}

#[test]
fn add_link_ignores_unknown_kinds() -> Result<(), String> {
    let mut summary = fixed_summary();
    if !summary.add_link("export-csv", "artifacts/export.csv") {
        return Err("Expected export-csv to be accepted".to_owned());
    }
    if !summary.add_link("k6_json", "loadtest/results.json") {
        return Err("Expected legacy k6_json to be accepted".to_owned());
    }
    if summary.add_link("screenshots", "shots/") {
        return Err("Expected unknown kind to be ignored".to_owned());
    }
    let links: Vec<(LinkKind, &str)> = summary.links().iter().collect();
    if links
        != vec![
            (LinkKind::ExportCsv, "artifacts/export.csv"),
            (LinkKind::LoadTestJson, "loadtest/results.json"),
        ]
    {
        return Err(format!("Unexpected links: {:?}", links));
    }
    Ok(())
}

#[test]
fn step_status_parses_case_insensitively() -> Result<(), String> {
    let parsed: Vec<StepStatus> = ["PASS", "fail", " Skip "]
        .iter()
        .map(|value| value.parse::<StepStatus>())
        .collect::<Result<_, _>>()
        .map_err(|err| err.to_string())?;
    if parsed != vec![StepStatus::Pass, StepStatus::Fail, StepStatus::Skip] {
        return Err(format!("Unexpected statuses: {:?}", parsed));
    }
    if "passed".parse::<StepStatus>().is_ok() {
        return Err("Expected unknown status to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn save_then_load_reproduces_summary() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("summary.json");

        let mut summary = fixed_summary();
        summary.add_step(
            "submit",
            StepStatus::Pass,
            120,
            Some(json!({ "id": "abc", "nested": { "list": [1, 2.5, null, "x"], "ok": true } })),
        );
        summary.add_step("analytics", StepStatus::Fail, 30, Some(json!("plain text")));
        summary.add_metrics(&LoadMetrics {
            p95_ms: Some(183.276_45),
            p99_ms: Some(412.1),
            success_rate: Some(99.5),
            total_requests: Some(1200),
        });
        summary.set_link(LinkKind::ExportCsv, "artifacts/export_2024-05-01.csv");

        save_summary(&path, &summary).await?;
        let loaded = load_summary(&path).await?;
        if loaded.as_ref() != Some(&summary) {
            return Err(AppError::summary(format!(
                "Round trip mismatch: {:?}",
                loaded
            )));
        }
        Ok(())
    })
}

#[test]
fn save_then_load_empty_summary() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let path = dir.path().join("summary.json");
        let summary = fixed_summary();
        save_summary(&path, &summary).await?;
        let loaded = load_summary(&path).await?;
        if loaded != Some(summary) {
            return Err(AppError::summary("Empty summary did not round trip"));
        }
        Ok(())
    })
}

#[test]
fn load_missing_summary_is_absent() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let path = dir.path().join("absent.json");
        if load_summary(&path).await?.is_some() {
            return Err(AppError::summary("Expected no summary"));
        }
        if load_existing_summary(&path).await.is_ok() {
            return Err(AppError::summary("Expected Missing error"));
        }
        Ok(())
    })
}

#[test]
fn unknown_top_level_fields_survive_round_trip() -> AppResult<()> {
    run_async_test(async {
        let dir = tempdir()?;
        let path = dir.path().join("summary.json");
        let document = json!({
            "run_at": "2024-05-01T12:30:00.000Z",
            "env": "local",
            "base_url": "http://127.0.0.1:3000",
            "steps": [],
            "metrics": { "p95_ms": null, "p99_ms": null, "success_rate": null, "total_requests": null },
            "links": {},
            "ci": { "job": 42, "branch": "main" }
        });
        tokio::fs::write(&path, document.to_string()).await?;

        let mut summary = load_existing_summary(&path).await?;
        summary.add_step("submit", StepStatus::Pass, 1, None);
        save_summary(&path, &summary).await?;

        let raw: serde_json::Value = serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?;
        if raw.get("ci") != Some(&json!({ "job": 42, "branch": "main" })) {
            return Err(AppError::summary("Unknown field was dropped"));
        }
        Ok(())
    })
}

#[test]
fn legacy_summary_layout_loads() -> Result<(), String> {
    let document = json!({
        "run_at": "2024-05-01T12:30:00.000Z",
        "env": "prod",
        "base_url": "https://api.example.com",
        "steps": [
            { "name": "submit", "status": "PASS", "ms": 88, "info": {}, "timestamp": "2024-05-01T12:30:01.000Z" }
        ],
        "metrics": { "k6": { "p95_ms": 210.0, "p99_ms": null, "success_rate": null, "total_requests": 0 } },
        "links": { "export_csv": null, "mailhog_html": "mail.html", "k6_html": null, "dynamo_json": null }
    });
    let summary: RunSummary =
        serde_json::from_value(document).map_err(|err| format!("parse failed: {}", err))?;
    let step = summary.steps().first().ok_or("missing step")?;
    if step.duration_ms != 88 {
        return Err("Expected legacy ms to map onto duration_ms".to_owned());
    }
    if summary.metrics().p95_ms != Some(210.0) {
        return Err("Expected nested k6 metrics to be read".to_owned());
    }
    if summary.links().get(LinkKind::MailCaptureHtml) != Some("mail.html") {
        return Err("Expected legacy mailhog_html link".to_owned());
    }
    Ok(())
}

#[test]
fn recorder_appends_from_concurrent_tasks() -> AppResult<()> {
    run_async_test(async {
        let recorder = StepRecorder::new(fixed_summary());
        let mut handles = Vec::new();
        for task in 0..8u64 {
            let recorder = recorder.clone();
            handles.push(tokio::spawn(async move {
                for step in 0..25u64 {
                    recorder.record(format!("task-{}-{}", task, step), StepStatus::Pass, step, None);
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle
                .await
                .map_err(|err| AppError::summary(format!("task failed: {}", err)))?;
        }
        let summary = recorder.into_summary();
        if summary.steps().len() != 200 {
            return Err(AppError::summary(format!(
                "Expected 200 steps, got {}",
                summary.steps().len()
            )));
        }
        // Within one task, steps keep the order they were appended in.
        let task_zero: Vec<u64> = summary
            .steps()
            .iter()
            .filter(|step| step.name.starts_with("task-0-"))
            .map(|step| step.duration_ms)
            .collect();
        if task_zero != (0..25).collect::<Vec<u64>>() {
            return Err(AppError::summary("Per-task order was not preserved"));
        }
        Ok(())
    })
}

#[test]
fn run_step_records_pass_and_fail() -> AppResult<()> {
    run_async_test(async {
        let recorder = StepRecorder::new(fixed_summary());
        let id = recorder
            .run_step("submit", async {
                Ok::<_, String>(("abc".to_owned(), json!({ "id": "abc" })))
            })
            .await;
        let missing = recorder
            .run_step("analytics", async {
                Err::<((), serde_json::Value), _>("HTTP 404".to_owned())
            })
            .await;
        recorder.skip("hmac_submit", "no secret configured");

        if id.as_deref() != Some("abc") || missing.is_some() {
            return Err(AppError::summary("Unexpected step return values"));
        }
        let summary = recorder.snapshot();
        let statuses: Vec<StepStatus> = summary.steps().iter().map(|step| step.status).collect();
        if statuses != vec![StepStatus::Pass, StepStatus::Fail, StepStatus::Skip] {
            return Err(AppError::summary(format!("Unexpected statuses: {:?}", statuses)));
        }
        let failed = summary
            .steps()
            .get(1)
            .ok_or_else(|| AppError::summary("missing failed step"))?;
        if failed.info != json!({ "error": "HTTP 404" }) {
            return Err(AppError::summary(format!("Unexpected info: {}", failed.info)));
        }
        Ok(())
    })
}
