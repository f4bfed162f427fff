//! Load-test result ingestion.
//!
//! Reads the line-delimited JSON stream written by k6 (`--out json=...`)
//! and folds it into [`LoadMetrics`](crate::summary::LoadMetrics). Lines are
//! parsed independently; a malformed line is skipped and counted, never
//! fatal. The k6 `--summary-export` document is supported as well.
mod export;
mod fold;
mod parsing;
mod reader;


pub use export::parse_summary_export;
pub use fold::{IngestReport, LoadMetricsFold, ingest_lines};
pub use parsing::{LoadRecord, parse_record};
pub use reader::{ingest_file, ingest_reader, ingest_summary_export_file};

pub(crate) const REQUEST_COUNT_METRIC: &str = "http_reqs";
pub(crate) const REQUEST_DURATION_METRIC: &str = "http_req_duration";
pub(crate) const REQUEST_FAILED_METRIC: &str = "http_req_failed";
