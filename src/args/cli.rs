use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use crate::summary::{LinkKind, StepStatus};

use super::parsers::{
    parse_body_json, parse_duration_arg, parse_info_json, parse_link_kind, parse_step_status,
};
use super::types::HttpMethod;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "End-to-end API test harness: signed HTTP checks, run summaries, load-test metrics and HTML/CSV reports."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML or JSON). Defaults to ./stepcheck.toml or ./stepcheck.json
    #[arg(long = "config", short = 'c', global = true)]
    pub config: Option<String>,

    /// Enable debug logging and log every HTTP call
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Create an empty run summary
    Create(CreateArgs),
    /// Append a step result to a run summary
    Append(AppendArgs),
    /// Attach an artifact link to a run summary
    Link(LinkArgs),
    /// Merge load-test results into a run summary
    Ingest(IngestArgs),
    /// Print pass/fail counts and success rate as JSON
    Overview(OverviewArgs),
    /// Render a run summary as HTML (and CSV)
    Report(ReportArgs),
    /// Send one authenticated request and print the response body
    Send(SendArgs),
    /// Run the end-to-end suite against the API
    Run(RunArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CreateArgs {
    /// Environment label (e.g. local, staging, prod)
    pub environment: String,

    /// Base URL under test
    pub base_url: String,

    /// Where to write the summary (defaults to <artifacts_dir>/summary.json)
    #[arg(long = "out", short = 'o')]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct AppendArgs {
    /// Summary file created by `create`
    pub summary: PathBuf,

    /// Step name
    pub name: String,

    /// PASS, FAIL or SKIP
    #[arg(value_parser = parse_step_status)]
    pub status: StepStatus,

    /// Step duration in milliseconds
    pub duration_ms: u64,

    /// Step details as a JSON value
    #[arg(value_parser = parse_info_json)]
    pub info: Option<Value>,
}

#[derive(Debug, Args, Clone)]
pub struct LinkArgs {
    /// Summary file created by `create`
    pub summary: PathBuf,

    /// export-csv, mail-capture-html, load-test-html, load-test-json or raw-export-json
    #[arg(value_parser = parse_link_kind)]
    pub kind: LinkKind,

    /// Artifact path or URL
    pub path: String,
}

#[derive(Debug, Args, Clone)]
pub struct IngestArgs {
    /// Summary file created by `create`
    pub summary: PathBuf,

    /// k6 result file (`--out json=...` stream)
    pub results: PathBuf,

    /// Treat the results file as a k6 `--summary-export` document
    #[arg(long = "summary-export")]
    pub summary_export: bool,
}

#[derive(Debug, Args, Clone)]
pub struct OverviewArgs {
    /// Summary file
    pub summary: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Summary file
    pub summary: PathBuf,

    /// HTML output path
    pub html_out: PathBuf,

    /// Also write the CSV summary here
    #[arg(long = "csv")]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SendArgs {
    /// Target URL
    pub url: String,

    /// HTTP method
    #[arg(long = "method", short = 'X', value_enum, default_value_t = HttpMethod::Get)]
    pub method: HttpMethod,

    /// JSON request body
    #[arg(long = "data", short = 'd', value_parser = parse_body_json)]
    pub data: Option<Value>,

    /// Ask for CSV and print the raw body
    #[arg(long = "csv")]
    pub csv: bool,

    /// API key (empty means none)
    #[arg(long = "api-key", env = "STEPCHECK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// HMAC signing secret (empty means unsigned)
    #[arg(long = "hmac-secret", env = "STEPCHECK_HMAC_SECRET", hide_env_values = true)]
    pub hmac_secret: Option<String>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", short = 't', value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Base URL under test
    #[arg(long = "base-url", short = 'u', env = "STEPCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Environment label recorded in the summary
    #[arg(long = "env", short = 'e')]
    pub environment: Option<String>,

    /// Form id used by submit/analytics/export
    #[arg(long = "form-id", env = "STEPCHECK_FORM_ID")]
    pub form_id: Option<String>,

    /// API key (empty means none)
    #[arg(long = "api-key", env = "STEPCHECK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// HMAC signing secret; the hmac_submit step is skipped without one
    #[arg(long = "hmac-secret", env = "STEPCHECK_HMAC_SECRET", hide_env_values = true)]
    pub hmac_secret: Option<String>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", short = 't', value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Directory for summary.json, reports and downloaded exports
    #[arg(long = "artifacts-dir", short = 'a')]
    pub artifacts_dir: Option<PathBuf>,

    /// k6 result stream to ingest after the API steps
    #[arg(long = "load-results")]
    pub load_results: Option<PathBuf>,

    /// Days of submissions requested from /export
    #[arg(long = "export-days", default_value_t = 7)]
    pub export_days: u32,
}
