use thiserror::Error;

use super::{
    ConfigError, HttpError, HttpStatusError, IngestError, NetworkFailure, ReportError,
    SummaryError, ValidationError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
    #[error("{0}")]
    Network(#[from] NetworkFailure),
    #[error("{0}")]
    Status(#[from] HttpStatusError),
    #[error("Summary error: {0}")]
    Summary(#[from] SummaryError),
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
    #[error("{failed} step(s) failed.")]
    StepsFailed { failed: usize },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn summary<E>(error: E) -> Self
    where
        E: Into<SummaryError>,
    {
        error.into().into()
    }

    pub fn ingest<E>(error: E) -> Self
    where
        E: Into<IngestError>,
    {
        error.into().into()
    }

    pub fn report<E>(error: E) -> Self
    where
        E: Into<ReportError>,
    {
        error.into().into()
    }
}
