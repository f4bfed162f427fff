use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepStatus {
    Pass,
    Fail,
    Skip,
}

impl StepStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pass => "PASS",
            StepStatus::Fail => "FAIL",
            StepStatus::Skip => "SKIP",
        }
    }

    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            StepStatus::Pass => "pass",
            StepStatus::Fail => "fail",
            StepStatus::Skip => "skip",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PASS" => Ok(StepStatus::Pass),
            "FAIL" => Ok(StepStatus::Fail),
            "SKIP" => Ok(StepStatus::Skip),
            _ => Err(ValidationError::InvalidStepStatus {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub status: StepStatus,
    #[serde(alias = "ms", default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub info: Value,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate load-test metrics. Every field stays `None` until ingested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MetricsRepr")]
pub struct LoadMetrics {
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub success_rate: Option<f64>,
    pub total_requests: Option<u64>,
}

impl LoadMetrics {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.p95_ms.is_none()
            && self.p99_ms.is_none()
            && self.success_rate.is_none()
            && self.total_requests.is_none()
    }

    /// Copies the fields that are set in `partial`, leaving the rest alone.
    pub fn merge(&mut self, partial: &LoadMetrics) {
        if partial.p95_ms.is_some() {
            self.p95_ms = partial.p95_ms;
        }
        if partial.p99_ms.is_some() {
            self.p99_ms = partial.p99_ms;
        }
        if partial.success_rate.is_some() {
            self.success_rate = partial.success_rate;
        }
        if partial.total_requests.is_some() {
            self.total_requests = partial.total_requests;
        }
    }
}

// Older summaries nest the same fields under `metrics.k6`.
#[derive(Deserialize, Default)]
struct MetricsRepr {
    #[serde(default)]
    p95_ms: Option<f64>,
    #[serde(default)]
    p99_ms: Option<f64>,
    #[serde(default)]
    success_rate: Option<f64>,
    #[serde(default)]
    total_requests: Option<u64>,
    #[serde(default)]
    k6: Option<Box<MetricsRepr>>,
}

impl From<MetricsRepr> for LoadMetrics {
    fn from(repr: MetricsRepr) -> Self {
        let mut metrics = repr.k6.map_or_else(LoadMetrics::default, |legacy| {
            LoadMetrics::from(*legacy)
        });
        metrics.merge(&LoadMetrics {
            p95_ms: repr.p95_ms,
            p99_ms: repr.p99_ms,
            success_rate: repr.success_rate,
            total_requests: repr.total_requests,
        });
        metrics
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    ExportCsv,
    MailCaptureHtml,
    LoadTestHtml,
    LoadTestJson,
    RawExportJson,
}

impl LinkKind {
    pub const ALL: [LinkKind; 5] = [
        LinkKind::ExportCsv,
        LinkKind::MailCaptureHtml,
        LinkKind::LoadTestHtml,
        LinkKind::LoadTestJson,
        LinkKind::RawExportJson,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LinkKind::ExportCsv => "export-csv",
            LinkKind::MailCaptureHtml => "mail-capture-html",
            LinkKind::LoadTestHtml => "load-test-html",
            LinkKind::LoadTestJson => "load-test-json",
            LinkKind::RawExportJson => "raw-export-json",
        }
    }

    /// Parses a kind, accepting kebab-case, snake_case and the legacy keys.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "export-csv" => Some(LinkKind::ExportCsv),
            "mail-capture-html" | "mailhog-html" => Some(LinkKind::MailCaptureHtml),
            "load-test-html" | "k6-html" => Some(LinkKind::LoadTestHtml),
            "load-test-json" | "k6-json" => Some(LinkKind::LoadTestJson),
            "raw-export-json" | "dynamo-json" => Some(LinkKind::RawExportJson),
            _ => None,
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub export_csv: Option<String>,
    #[serde(default, alias = "mailhog_html")]
    pub mail_capture_html: Option<String>,
    #[serde(default, alias = "k6_html")]
    pub load_test_html: Option<String>,
    #[serde(default, alias = "k6_json")]
    pub load_test_json: Option<String>,
    #[serde(default, alias = "dynamo_json")]
    pub raw_export_json: Option<String>,
}

impl Links {
    #[must_use]
    pub fn get(&self, kind: LinkKind) -> Option<&str> {
        let slot = match kind {
            LinkKind::ExportCsv => &self.export_csv,
            LinkKind::MailCaptureHtml => &self.mail_capture_html,
            LinkKind::LoadTestHtml => &self.load_test_html,
            LinkKind::LoadTestJson => &self.load_test_json,
            LinkKind::RawExportJson => &self.raw_export_json,
        };
        slot.as_deref()
    }

    pub fn set(&mut self, kind: LinkKind, path: String) {
        let slot = match kind {
            LinkKind::ExportCsv => &mut self.export_csv,
            LinkKind::MailCaptureHtml => &mut self.mail_capture_html,
            LinkKind::LoadTestHtml => &mut self.load_test_html,
            LinkKind::LoadTestJson => &mut self.load_test_json,
            LinkKind::RawExportJson => &mut self.raw_export_json,
        };
        *slot = Some(path);
    }

    /// Set links in fixed kind order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkKind, &str)> + '_ {
        LinkKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|path| (kind, path)))
    }
}

/// Accumulated record of one test run.
///
/// Steps are append-only and keep execution order. Unknown top-level
/// fields read from disk are kept in `extra` and written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    run_at: DateTime<Utc>,
    #[serde(rename = "env", alias = "environment")]
    environment: String,
    base_url: String,
    #[serde(default)]
    steps: Vec<StepResult>,
    #[serde(default)]
    metrics: LoadMetrics,
    #[serde(default)]
    links: Links,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RunSummary {
    #[must_use]
    pub fn new(environment: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::new_at(environment, base_url, Utc::now())
    }

    #[must_use]
    pub fn new_at(
        environment: impl Into<String>,
        base_url: impl Into<String>,
        run_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_at,
            environment: environment.into(),
            base_url: base_url.into(),
            steps: Vec::new(),
            metrics: LoadMetrics::default(),
            links: Links::default(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub const fn run_at(&self) -> DateTime<Utc> {
        self.run_at
    }

    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    #[must_use]
    pub const fn metrics(&self) -> &LoadMetrics {
        &self.metrics
    }

    #[must_use]
    pub const fn links(&self) -> &Links {
        &self.links
    }

    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Appends a step stamped with the current time. A missing `info`
    /// becomes an empty object.
    pub fn add_step(
        &mut self,
        name: impl Into<String>,
        status: StepStatus,
        duration_ms: u64,
        info: Option<Value>,
    ) {
        self.steps.push(StepResult {
            name: name.into(),
            status,
            duration_ms,
            info: info.unwrap_or_else(|| Value::Object(Map::new())),
            timestamp: Utc::now(),
        });
    }

    pub fn add_metrics(&mut self, partial: &LoadMetrics) {
        self.metrics.merge(partial);
    }

    /// Sets a link when `kind` names a known artifact kind.
    ///
    /// Unknown kinds are ignored and `false` is returned.
    pub fn add_link(&mut self, kind: &str, path: impl Into<String>) -> bool {
        match LinkKind::parse(kind) {
            Some(kind) => {
                self.links.set(kind, path.into());
                true
            }
            None => {
                debug!("Ignoring unknown link kind '{}'", kind);
                false
            }
        }
    }

    pub fn set_link(&mut self, kind: LinkKind, path: impl Into<String>) {
        self.links.set(kind, path.into());
    }
}
