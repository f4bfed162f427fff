//! End-to-end suite run by the `run` command.
//!
//! Steps run in a fixed order and never stop the run: a failing step is
//! recorded and the next one starts. Artifacts (summary, reports, the CSV
//! export and the last submission id) land in the artifacts directory.
mod checks;


use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::RunSettings;
use crate::error::AppResult;
use crate::http::SignedHttpClient;
use crate::report::{render, write_report};
use crate::summary::{LinkKind, Overview, RunSummary, StepRecorder, save_summary};

use checks::{SUBMISSION_ID_FILE, SuiteContext, save_artifact};

pub const SUMMARY_FILE: &str = "summary.json";
pub const REPORT_HTML_FILE: &str = "report.html";
pub const REPORT_CSV_FILE: &str = "report.csv";

#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub summary: RunSummary,
    pub overview: Overview,
    pub summary_path: PathBuf,
    pub html_path: PathBuf,
    pub csv_path: PathBuf,
}

/// Runs every step against `settings.base_url` and writes the artifacts.
///
/// # Errors
///
/// Returns an error only when the run itself cannot proceed (client setup,
/// artifacts directory, summary or report writing). Failed steps are
/// recorded, not returned.
pub async fn run_suite(settings: &RunSettings) -> AppResult<SuiteOutcome> {
    tokio::fs::create_dir_all(&settings.artifacts_dir).await?;
    let client = SignedHttpClient::new(&settings.client_settings())?;
    let recorder = StepRecorder::new(RunSummary::new(
        settings.environment.as_str(),
        settings.base_url.as_str(),
    ));
    let ctx = SuiteContext { client, settings };

    info!(
        "Running end-to-end suite ({}) against {}",
        settings.environment, settings.base_url
    );

    recorder
        .run_step("sanity_config", async { ctx.sanity() })
        .await;
    recorder
        .run_step("api_connectivity", ctx.connectivity())
        .await;

    let submitted = recorder
        .run_step(
            "submit",
            ctx.submit(&settings.request_options(), "This is a test submission"),
        )
        .await;
    if let Some(id) = submitted {
        let path = settings.artifacts_dir.join(SUBMISSION_ID_FILE);
        if let Err(err) = save_artifact(&path, &id).await {
            warn!("{}", err);
        }
    }

    recorder.run_step("analytics", ctx.analytics()).await;

    if let Some(export_path) = recorder.run_step("export", ctx.export()).await {
        recorder.set_link(LinkKind::ExportCsv, export_path.display().to_string());
    }

    if settings
        .hmac_secret
        .as_deref()
        .is_some_and(|secret| !secret.is_empty())
    {
        recorder
            .run_step(
                "hmac_submit",
                ctx.submit(
                    &settings.signed_request_options(),
                    "HMAC signed test submission",
                ),
            )
            .await;
    } else {
        recorder.skip("hmac_submit", "no HMAC secret configured");
    }

    if let Some(load_results) = settings.load_results.as_deref() {
        let metrics = recorder
            .run_step("load_test_ingest", ctx.load_results(load_results))
            .await;
        if let Some(metrics) = metrics {
            recorder.merge_metrics(&metrics);
            recorder.set_link(LinkKind::LoadTestJson, load_results.display().to_string());
        }
    }

    let summary = recorder.into_summary();
    let summary_path = settings.artifacts_dir.join(SUMMARY_FILE);
    let html_path = settings.artifacts_dir.join(REPORT_HTML_FILE);
    let csv_path = settings.artifacts_dir.join(REPORT_CSV_FILE);

    save_summary(&summary_path, &summary).await?;
    let report = render(&summary)?;
    write_report(&report, &html_path, Some(&csv_path)).await?;

    let overview = summary.overview();
    info!(
        "{} passed, {} failed, {} skipped of {} steps ({}) in {}ms",
        overview.passed,
        overview.failed,
        overview.skipped,
        overview.total,
        overview.success_rate,
        overview.total_duration_ms
    );

    Ok(SuiteOutcome {
        summary,
        overview,
        summary_path,
        html_path,
        csv_path,
    })
}
