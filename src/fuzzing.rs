use std::time::Duration;

use chrono::{TimeZone, Utc};

use crate::args::{RunArgs, parsers::parse_duration_arg};
use crate::config::{ConfigFile, RunSettings, resolve_run_settings};
use crate::error::{AppError, AppResult, ConfigError};
use crate::report::{RenderedReport, render_at};
use crate::summary::RunSummary;

/// Parses a duration argument (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input)
}

fn resolve_run(config: &ConfigFile) -> AppResult<RunSettings> {
    let args = RunArgs {
        base_url: None,
        environment: None,
        form_id: None,
        api_key: None,
        hmac_secret: None,
        timeout: None,
        artifacts_dir: None,
        load_results: None,
        export_days: 7,
    };
    Ok(resolve_run_settings(&args, false, Some(config))?)
}

/// Parses TOML config content and resolves `run` settings from it.
///
/// # Errors
///
/// Returns an error when parsing or resolution fails.
pub fn resolve_run_from_toml(input: &str) -> AppResult<RunSettings> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: "<fuzz>".into(),
            source: err,
        })
    })?;
    resolve_run(&config)
}

/// Parses JSON config content and resolves `run` settings from it.
///
/// # Errors
///
/// Returns an error when parsing or resolution fails.
pub fn resolve_run_from_json(input: &str) -> AppResult<RunSettings> {
    let config: ConfigFile = serde_json::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseJson {
            path: "<fuzz>".into(),
            source: err,
        })
    })?;
    resolve_run(&config)
}

/// Parses a summary document and renders it at a fixed time.
///
/// # Errors
///
/// Returns an error when the JSON is not a summary or rendering fails.
pub fn render_summary_json(input: &str) -> AppResult<(RunSummary, RenderedReport)> {
    let summary: RunSummary = serde_json::from_str(input)?;
    let generated_at = Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now);
    let rendered = render_at(&summary, generated_at)?;
    Ok((summary, rendered))
}
