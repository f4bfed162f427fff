use serde::Deserialize;
use serde_json::Value;

use crate::error::MalformedRecord;

/// One usable line of the load-test result stream.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadRecord {
    /// A single sample, e.g. one `http_reqs` count per request.
    Point { metric: String, value: Option<f64> },
    /// An aggregate with precomputed percentiles.
    Summary {
        metric: String,
        p95: Option<f64>,
        p99: Option<f64>,
    },
    /// Metric declarations and anything else this ingestor does not use.
    Other { kind: String },
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    metric: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Parses one line of the stream.
///
/// # Errors
///
/// Returns `MalformedRecord` for blank lines, invalid JSON, records missing
/// their `type`/`metric`, and `Summary` records without a `data.summary`
/// object.
pub fn parse_record(line: &str) -> Result<LoadRecord, MalformedRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(MalformedRecord::Blank);
    }
    let raw: RawRecord =
        serde_json::from_str(trimmed).map_err(|err| MalformedRecord::Json { source: err })?;
    let kind = raw
        .kind
        .ok_or(MalformedRecord::MissingField { field: "type" })?;

    match kind.as_str() {
        "Point" => Ok(LoadRecord::Point {
            metric: raw
                .metric
                .ok_or(MalformedRecord::MissingField { field: "metric" })?,
            value: raw.data.get("value").and_then(Value::as_f64),
        }),
        "Summary" => {
            let metric = raw
                .metric
                .ok_or(MalformedRecord::MissingField { field: "metric" })?;
            let summary = raw
                .data
                .get("summary")
                .filter(|summary| summary.is_object())
                .ok_or(MalformedRecord::MissingField {
                    field: "data.summary",
                })?;
            Ok(LoadRecord::Summary {
                metric,
                p95: summary.get("p(95)").and_then(Value::as_f64),
                p99: summary.get("p(99)").and_then(Value::as_f64),
            })
        }
        _ => Ok(LoadRecord::Other { kind }),
    }
}
