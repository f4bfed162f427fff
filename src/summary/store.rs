use std::path::Path;

use tracing::info;

use crate::error::SummaryError;

use super::types::RunSummary;

/// Writes the summary as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error when the summary cannot be serialized or written.
pub async fn save_summary(path: &Path, summary: &RunSummary) -> Result<(), SummaryError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| SummaryError::Write {
                path: parent.to_path_buf(),
                source: err,
            })?;
    }
    let json = serde_json::to_vec_pretty(summary)
        .map_err(|err| SummaryError::Serialize { source: err })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|err| SummaryError::Write {
            path: path.to_path_buf(),
            source: err,
        })?;
    info!("Summary saved to {}", path.display());
    Ok(())
}

/// Reads a summary. A missing file yields `Ok(None)`, not an empty summary.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub async fn load_summary(path: &Path) -> Result<Option<RunSummary>, SummaryError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(SummaryError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|err| SummaryError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
}

/// Like [`load_summary`], but a missing file is an error.
///
/// # Errors
///
/// Returns `SummaryError::Missing` when no summary exists at `path`, or any
/// error from [`load_summary`].
pub async fn load_existing_summary(path: &Path) -> Result<RunSummary, SummaryError> {
    load_summary(path)
        .await?
        .ok_or_else(|| SummaryError::Missing {
            path: path.to_path_buf(),
        })
}
