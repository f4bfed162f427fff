use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::{info, warn};

use super::overview::Overview;
use super::types::{LinkKind, LoadMetrics, RunSummary, StepStatus};

/// Shared handle for recording steps from concurrent tasks.
///
/// Appends are serialised through a mutex, so each step lands whole and in
/// the order the appends were made.
#[derive(Debug, Clone)]
pub struct StepRecorder {
    inner: Arc<Mutex<RunSummary>>,
}

impl StepRecorder {
    #[must_use]
    pub fn new(summary: RunSummary) -> Self {
        Self {
            inner: Arc::new(Mutex::new(summary)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunSummary> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(
        &self,
        name: impl Into<String>,
        status: StepStatus,
        duration_ms: u64,
        info: Option<Value>,
    ) {
        self.lock().add_step(name, status, duration_ms, info);
    }

    pub fn skip(&self, name: &str, reason: &str) {
        info!("SKIP {}: {}", name, reason);
        self.record(name, StepStatus::Skip, 0, Some(json!({ "reason": reason })));
    }

    pub fn merge_metrics(&self, partial: &LoadMetrics) {
        self.lock().add_metrics(partial);
    }

    pub fn add_link(&self, kind: &str, path: impl Into<String>) -> bool {
        self.lock().add_link(kind, path)
    }

    pub fn set_link(&self, kind: LinkKind, path: impl Into<String>) {
        self.lock().set_link(kind, path);
    }

    #[must_use]
    pub fn overview(&self) -> Overview {
        self.lock().overview()
    }

    #[must_use]
    pub fn snapshot(&self) -> RunSummary {
        self.lock().clone()
    }

    #[must_use]
    pub fn into_summary(self) -> RunSummary {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => {
                let guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
                guard.clone()
            }
        }
    }

    /// Times `check` and records its result under `name`.
    ///
    /// `Ok((value, info))` records PASS with `info` and yields `value`;
    /// `Err(err)` records FAIL with `{"error": err}` and yields `None`.
    /// The step is recorded only after `check` has finished.
    pub async fn run_step<F, T, E>(&self, name: &str, check: F) -> Option<T>
    where
        F: Future<Output = Result<(T, Value), E>>,
        E: Display,
    {
        let started = Instant::now();
        let result = check.await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok((value, step_info)) => {
                info!("PASS {} ({}ms)", name, duration_ms);
                self.record(name, StepStatus::Pass, duration_ms, Some(step_info));
                Some(value)
            }
            Err(err) => {
                let message = err.to_string();
                warn!("FAIL {} ({}ms): {}", name, duration_ms, message);
                self.record(
                    name,
                    StepStatus::Fail,
                    duration_ms,
                    Some(json!({ "error": message })),
                );
                None
            }
        }
    }
}
