use tracing::debug;

use crate::error::MalformedRecord;
use crate::summary::LoadMetrics;

use super::parsing::{LoadRecord, parse_record};
use super::{REQUEST_COUNT_METRIC, REQUEST_DURATION_METRIC, REQUEST_FAILED_METRIC};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub metrics: LoadMetrics,
    pub parsed: usize,
    pub skipped: usize,
}

/// Accumulates parsed records; errors only bump the skip counter.
#[derive(Debug, Clone, Default)]
pub struct LoadMetricsFold {
    total_requests: u64,
    failed_samples: u64,
    failed_flagged: u64,
    p95_ms: Option<f64>,
    p99_ms: Option<f64>,
    parsed: usize,
    skipped: usize,
}

impl LoadMetricsFold {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, record: Result<LoadRecord, MalformedRecord>) {
        let record = match record {
            Ok(record) => record,
            Err(MalformedRecord::Blank) => return,
            Err(err) => {
                self.skipped = self.skipped.saturating_add(1);
                debug!("Skipping load-test record: {}", err);
                return;
            }
        };
        self.parsed = self.parsed.saturating_add(1);

        match record {
            LoadRecord::Point { metric, value } => {
                if metric == REQUEST_COUNT_METRIC {
                    self.total_requests = self.total_requests.saturating_add(1);
                } else if metric == REQUEST_FAILED_METRIC {
                    self.failed_samples = self.failed_samples.saturating_add(1);
                    if value.is_some_and(|value| value > 0.0) {
                        self.failed_flagged = self.failed_flagged.saturating_add(1);
                    }
                }
            }
            LoadRecord::Summary { metric, p95, p99 } => {
                if metric == REQUEST_DURATION_METRIC {
                    self.p95_ms = p95;
                    self.p99_ms = p99;
                }
            }
            LoadRecord::Other { .. } => {}
        }
    }

    #[must_use]
    pub fn finish(self) -> IngestReport {
        let success_rate = self
            .failed_samples
            .checked_sub(self.failed_flagged)
            .and_then(|passed| {
                passed
                    .saturating_mul(10_000)
                    .checked_div(self.failed_samples)
            })
            .map(percent_from_x100);

        IngestReport {
            metrics: LoadMetrics {
                p95_ms: self.p95_ms,
                p99_ms: self.p99_ms,
                success_rate,
                total_requests: Some(self.total_requests),
            },
            parsed: self.parsed,
            skipped: self.skipped,
        }
    }
}

/// Folds an in-memory stream of lines.
pub fn ingest_lines<'line, I>(lines: I) -> IngestReport
where
    I: IntoIterator<Item = &'line str>,
{
    let mut fold = LoadMetricsFold::new();
    for line in lines {
        fold.apply(parse_record(line));
    }
    fold.finish()
}

#[expect(
    clippy::float_arithmetic,
    reason = "percentages are stored as f64 in the summary"
)]
pub(super) fn percent_from_x100(x100: u64) -> f64 {
    let whole = u32::try_from(x100).unwrap_or(u32::MAX);
    f64::from(whole) / 100.0
}
