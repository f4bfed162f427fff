use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{Value, json};
use tracing::info;

use crate::config::RunSettings;
use crate::error::{CheckError, FailureKind, HttpStatusError};
use crate::http::{RequestOptions, RequestOutcome, SignedHttpClient, endpoint_url};
use crate::ingest::ingest_file;
use crate::summary::LoadMetrics;

pub(super) const SUBMISSION_ID_FILE: &str = "last_submission_id.txt";

/// Step inputs shared by every check of one run.
pub(super) struct SuiteContext<'run> {
    pub(super) client: SignedHttpClient,
    pub(super) settings: &'run RunSettings,
}

impl SuiteContext<'_> {
    fn url(&self, path: &str) -> Result<String, CheckError> {
        Ok(endpoint_url(&self.settings.base_url, path)?)
    }

    fn submission_payload(&self, message: &str) -> Value {
        json!({
            "form_id": self.settings.form_id,
            "name": "Test User",
            "email": "test@example.com",
            "message": message,
            "timestamp": Utc::now().timestamp(),
        })
    }

    pub(super) fn sanity(&self) -> Result<((), Value), CheckError> {
        url::Url::parse(&self.settings.base_url).map_err(|err| CheckError::InvalidSetting {
            message: format!("base URL '{}': {}", self.settings.base_url, err),
        })?;
        if self.settings.form_id.trim().is_empty() {
            return Err(CheckError::InvalidSetting {
                message: "form id is empty".to_owned(),
            });
        }
        info!("Base URL: {}", self.settings.base_url);
        info!("Form ID: {}", self.settings.form_id);
        Ok((
            (),
            json!({
                "base_url": self.settings.base_url,
                "form_id": self.settings.form_id,
                "api_key": self.settings.api_key.as_deref().is_some_and(|key| !key.is_empty()),
                "hmac": self.settings.hmac_secret.as_deref().is_some_and(|key| !key.is_empty()),
            }),
        ))
    }

    /// Any HTTP response, whatever the status, proves the API is reachable.
    pub(super) async fn connectivity(&self) -> Result<((), Value), CheckError> {
        let url = self.url("/")?;
        match self
            .client
            .get_json(&url, &self.settings.request_options())
            .await
        {
            Ok(outcome) => Ok(((), json!({ "status": outcome.status }))),
            Err(failure) if failure.kind == FailureKind::InvalidJson => {
                Ok(((), json!({ "note": failure.message })))
            }
            Err(failure) => Err(failure.into()),
        }
    }

    pub(super) async fn submit(
        &self,
        options: &RequestOptions,
        message: &str,
    ) -> Result<(String, Value), CheckError> {
        let url = self.url("/submit")?;
        info!("Submitting form: {}", self.settings.form_id);
        let outcome = self
            .client
            .post_json(&url, &self.submission_payload(message), options)
            .await?;
        expect_created_or_ok(&outcome)?;
        let id = match outcome.json_field("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(CheckError::MissingField { field: "id" }),
        };
        info!("Submission id: {}", id);
        Ok((id.clone(), json!({ "id": id, "status": outcome.status })))
    }

    pub(super) async fn analytics(&self) -> Result<((), Value), CheckError> {
        let url = self.url("/analytics")?;
        let payload = json!({ "form_id": self.settings.form_id });
        let outcome = self
            .client
            .post_json(&url, &payload, &self.settings.request_options())
            .await?;
        expect_created_or_ok(&outcome)?;
        let totals = outcome
            .json_field("totals")
            .cloned()
            .ok_or(CheckError::MissingField { field: "totals" })?;
        info!("Total submissions: {}", totals);
        Ok(((), json!({ "totals": totals })))
    }

    /// Downloads the CSV export into the artifacts directory.
    pub(super) async fn export(&self) -> Result<(PathBuf, Value), CheckError> {
        let url = self.url("/export")?;
        let payload = json!({
            "form_id": self.settings.form_id,
            "days": self.settings.export_days,
        });
        let outcome = self
            .client
            .post_csv(&url, &payload, &self.settings.request_options())
            .await?;
        expect_created_or_ok(&outcome)?;
        let csv = outcome.body.to_display_string();
        if !csv.contains("form_id") {
            return Err(CheckError::MissingContent { needle: "form_id" });
        }

        let file_name = format!("export_{}.csv", Utc::now().format("%Y-%m-%d"));
        let path = self.settings.artifacts_dir.join(file_name);
        save_artifact(&path, &csv).await?;
        let lines = csv.lines().count();
        info!("Export saved to {} ({} lines)", path.display(), lines);
        Ok((
            path.clone(),
            json!({ "file": path.display().to_string(), "lines": lines }),
        ))
    }

    pub(super) async fn load_results(
        &self,
        path: &Path,
    ) -> Result<(LoadMetrics, Value), CheckError> {
        let report = ingest_file(path).await?;
        Ok((
            report.metrics,
            json!({ "parsed": report.parsed, "skipped": report.skipped }),
        ))
    }
}

fn expect_created_or_ok(outcome: &RequestOutcome) -> Result<(), CheckError> {
    if matches!(outcome.status, 200 | 201) {
        return Ok(());
    }
    Err(HttpStatusError {
        status: outcome.status,
        body: outcome.body.to_display_string(),
    }
    .into())
}

pub(super) async fn save_artifact(path: &Path, contents: &str) -> Result<(), CheckError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|err| CheckError::SaveArtifact {
            path: path.to_path_buf(),
            source: err,
        })
}
