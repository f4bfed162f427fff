mod app;
mod check;
mod config;
mod http;
mod ingest;
mod network;
mod report;
mod summary;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use check::CheckError;
pub use config::ConfigError;
pub use http::{HttpError, HttpStatusError};
pub use ingest::{IngestError, MalformedRecord};
pub use network::{FailureKind, NetworkFailure};
pub use report::ReportError;
pub use summary::SummaryError;
pub use validation::ValidationError;
