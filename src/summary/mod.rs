//! Run summary model: recorded steps, ingested load metrics, artifact links.
mod overview;
mod recorder;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use overview::{Overview, SuccessRate};
pub use recorder::StepRecorder;
pub use store::{load_existing_summary, load_summary, save_summary};
pub use types::{LinkKind, Links, LoadMetrics, RunSummary, StepResult, StepStatus};
