use std::path::Path;

use tracing::info;

use crate::error::ReportError;

use super::RenderedReport;

/// Writes the HTML report and, when `csv_path` is given, the CSV summary.
///
/// # Errors
///
/// Returns an error naming the path that could not be created or written.
pub async fn write_report(
    report: &RenderedReport,
    html_path: &Path,
    csv_path: Option<&Path>,
) -> Result<(), ReportError> {
    write_file(html_path, &report.html).await?;
    info!("HTML report saved to {}", html_path.display());
    if let Some(csv_path) = csv_path {
        write_file(csv_path, &report.csv).await?;
        info!("CSV summary saved to {}", csv_path.display());
    }
    Ok(())
}

async fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| ReportError::CreateDir {
                path: parent.to_path_buf(),
                source: err,
            })?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|err| ReportError::Write {
            path: path.to_path_buf(),
            source: err,
        })
}
