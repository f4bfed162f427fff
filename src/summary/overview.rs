use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::types::{RunSummary, StepStatus};

/// Share of passed steps, in hundredths of a percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessRate {
    /// The run has no steps.
    NotApplicable,
    Percent { x100: u64 },
}

impl SuccessRate {
    /// `passed / total * 100`, rounded half-up to two decimals.
    #[must_use]
    pub fn from_counts(passed: usize, total: usize) -> Self {
        let (Ok(passed), Ok(total)) = (u64::try_from(passed), u64::try_from(total)) else {
            return SuccessRate::NotApplicable;
        };
        passed
            .saturating_mul(10_000)
            .saturating_add(total / 2)
            .checked_div(total)
            .map_or(SuccessRate::NotApplicable, |x100| SuccessRate::Percent {
                x100,
            })
    }
}

impl fmt::Display for SuccessRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessRate::NotApplicable => f.write_str("N/A"),
            SuccessRate::Percent { x100 } => write!(f, "{}.{:02}%", x100 / 100, x100 % 100),
        }
    }
}

impl Serialize for SuccessRate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Derived counts for a run; computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    #[serde(rename = "env")]
    pub environment: String,
    pub run_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub success_rate: SuccessRate,
    pub total_duration_ms: u64,
}

impl RunSummary {
    #[must_use]
    pub fn overview(&self) -> Overview {
        let steps = self.steps();
        let count = |status: StepStatus| steps.iter().filter(|step| step.status == status).count();
        let passed = count(StepStatus::Pass);
        let total_duration_ms = steps
            .iter()
            .fold(0u64, |sum, step| sum.saturating_add(step.duration_ms));

        Overview {
            environment: self.environment().to_owned(),
            run_at: self.run_at(),
            total: steps.len(),
            passed,
            failed: count(StepStatus::Fail),
            skipped: count(StepStatus::Skip),
            success_rate: SuccessRate::from_counts(passed, steps.len()),
            total_duration_ms,
        }
    }
}
