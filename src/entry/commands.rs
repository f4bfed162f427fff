use serde::Serialize;
use tracing::{info, warn};

use crate::args::{
    AppendArgs, CreateArgs, IngestArgs, LinkArgs, OverviewArgs, ReportArgs, RunArgs, SendArgs,
};
use crate::config::{ConfigFile, artifacts_dir, resolve_run_settings, resolve_send_options};
use crate::error::{AppError, AppResult};
use crate::http::{ClientSettings, SignedHttpClient};
use crate::ingest::{ingest_file, ingest_summary_export_file};
use crate::report::{render, write_report};
use crate::suite::{SUMMARY_FILE, run_suite};
use crate::summary::{LinkKind, RunSummary, load_existing_summary, save_summary};

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) async fn create(args: &CreateArgs, config: Option<&ConfigFile>) -> AppResult<()> {
    let path = args
        .out
        .clone()
        .unwrap_or_else(|| artifacts_dir(config).join(SUMMARY_FILE));
    let summary = RunSummary::new(args.environment.as_str(), args.base_url.as_str());
    save_summary(&path, &summary).await?;
    print_json(&summary)
}

pub(super) async fn append(args: AppendArgs) -> AppResult<()> {
    let mut summary = load_existing_summary(&args.summary).await?;
    summary.add_step(args.name, args.status, args.duration_ms, args.info);
    save_summary(&args.summary, &summary).await?;
    match summary.steps().last() {
        Some(step) => print_json(step),
        None => Ok(()),
    }
}

pub(super) async fn link(args: LinkArgs) -> AppResult<()> {
    let mut summary = load_existing_summary(&args.summary).await?;
    summary.set_link(args.kind, args.path);
    save_summary(&args.summary, &summary).await?;
    print_json(summary.links())
}

pub(super) async fn ingest(args: &IngestArgs) -> AppResult<()> {
    let mut summary = load_existing_summary(&args.summary).await?;
    let metrics = if args.summary_export {
        ingest_summary_export_file(&args.results).await?
    } else {
        let report = ingest_file(&args.results).await?;
        summary.set_link(LinkKind::LoadTestJson, args.results.display().to_string());
        report.metrics
    };
    if metrics.is_empty() {
        warn!("No load-test metrics found in {}", args.results.display());
    }
    summary.add_metrics(&metrics);
    save_summary(&args.summary, &summary).await?;
    print_json(summary.metrics())
}

pub(super) async fn overview(args: &OverviewArgs) -> AppResult<()> {
    let summary = load_existing_summary(&args.summary).await?;
    print_json(&summary.overview())
}

pub(super) async fn report(args: &ReportArgs) -> AppResult<()> {
    let summary = load_existing_summary(&args.summary).await?;
    let rendered = render(&summary)?;
    write_report(&rendered, &args.html_out, args.csv.as_deref()).await?;
    Ok(())
}

pub(super) async fn send(
    args: &SendArgs,
    verbose: bool,
    config: Option<&ConfigFile>,
) -> AppResult<()> {
    let (options, conventions) = resolve_send_options(args, verbose, config)?;
    let client = SignedHttpClient::new(&ClientSettings {
        conventions,
        ..ClientSettings::default()
    })?;

    let body = args.data.as_ref();
    let outcome = if args.csv {
        client
            .send_csv(args.method, &args.url, body, &options)
            .await?
    } else {
        client.send(args.method, &args.url, body, &options).await?
    };

    println!("{}", outcome.body.to_display_string());
    outcome.ensure_success().map_err(AppError::from)
}

pub(super) async fn run(
    args: &RunArgs,
    verbose: bool,
    config: Option<&ConfigFile>,
) -> AppResult<()> {
    let settings = resolve_run_settings(args, verbose, config)?;
    let outcome = run_suite(&settings).await?;
    info!("Summary: {}", outcome.summary_path.display());
    info!("Report: {}", outcome.html_path.display());
    print_json(&outcome.overview)?;

    if outcome.overview.failed > 0 {
        return Err(AppError::StepsFailed {
            failed: outcome.overview.failed,
        });
    }
    Ok(())
}
