use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::error::{IngestError, MalformedRecord};
use crate::summary::LoadMetrics;

use super::export::parse_summary_export;
use super::fold::{IngestReport, LoadMetricsFold};
use super::parsing::parse_record;

/// Streams a result file line by line into a [`LoadMetricsFold`].
///
/// # Errors
///
/// Returns an error only when the file cannot be opened or read. Malformed
/// lines, including lines that are not UTF-8, are skipped.
pub async fn ingest_file(path: &Path) -> Result<IngestReport, IngestError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|err| IngestError::Open {
            path: path.to_path_buf(),
            source: err,
        })?;
    let report = ingest_reader(BufReader::new(file), path).await?;
    info!(
        "Ingested {} load-test records from {} ({} skipped)",
        report.parsed,
        path.display(),
        report.skipped
    );
    Ok(report)
}

/// Folds any buffered reader; `path` is only used for error context.
///
/// # Errors
///
/// Returns an error when reading from `reader` fails.
pub async fn ingest_reader<R>(mut reader: R, path: &Path) -> Result<IngestReport, IngestError>
where
    R: AsyncBufRead + Unpin,
{
    let mut fold = LoadMetricsFold::new();
    let mut buf: Vec<u8> = Vec::new();
    let mut line_no: usize = 0;

    loop {
        buf.clear();
        let bytes = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|err| IngestError::Read {
                path: path.to_path_buf(),
                source: err,
            })?;
        if bytes == 0 {
            break;
        }
        line_no = line_no.saturating_add(1);

        let record = match std::str::from_utf8(&buf) {
            Ok(line) => parse_record(line),
            Err(_) => {
                debug!("{}:{} is not valid UTF-8", path.display(), line_no);
                Err(MalformedRecord::Utf8)
            }
        };
        fold.apply(record);
    }

    Ok(fold.finish())
}

/// Reads a k6 `--summary-export` document.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not valid JSON.
pub async fn ingest_summary_export_file(path: &Path) -> Result<LoadMetrics, IngestError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| IngestError::Read {
            path: path.to_path_buf(),
            source: err,
        })?;
    let value = serde_json::from_str(&contents).map_err(|err| IngestError::SummaryExport {
        path: path.to_path_buf(),
        source: err,
    })?;
    Ok(parse_summary_export(&value))
}
