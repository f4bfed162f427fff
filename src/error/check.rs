use std::path::PathBuf;

use thiserror::Error;

use super::{HttpError, HttpStatusError, IngestError, NetworkFailure};

/// Why a suite step failed. Recorded in the step's `info.error`.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Network(#[from] NetworkFailure),
    #[error(transparent)]
    Status(#[from] HttpStatusError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("Response has no '{field}' field")]
    MissingField { field: &'static str },
    #[error("Response does not mention '{needle}'")]
    MissingContent { needle: &'static str },
    #[error("Invalid configuration: {message}")]
    InvalidSetting { message: String },
    #[error("Failed to save artifact '{path}': {source}")]
    SaveArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
