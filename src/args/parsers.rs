use std::time::Duration;

use serde_json::Value;

use crate::error::{AppError, AppResult, ValidationError};
use crate::summary::{LinkKind, StepStatus};

pub(crate) fn parse_step_status(s: &str) -> Result<StepStatus, ValidationError> {
    s.parse::<StepStatus>()
}

pub(crate) fn parse_link_kind(s: &str) -> Result<LinkKind, ValidationError> {
    LinkKind::parse(s).ok_or_else(|| ValidationError::InvalidLinkKind {
        value: s.to_owned(),
    })
}

pub(crate) fn parse_info_json(s: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(s).map_err(|err| ValidationError::InvalidInfoJson { source: err })
}

pub(crate) fn parse_body_json(s: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(s).map_err(|err| ValidationError::InvalidBodyJson { source: err })
}

/// Parses `500ms`, `10s`, `2m`, `1h`; a bare number is seconds.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DurationEmpty));
    }

    let digits_len = value
        .chars()
        .take_while(char::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let seconds_per_unit: u64 = match unit_part.trim() {
        "ms" => {
            return non_zero(Duration::from_millis(number));
        }
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        other => {
            return Err(AppError::validation(ValidationError::InvalidDurationUnit {
                unit: other.to_owned(),
            }));
        }
    };
    let secs = number
        .checked_mul(seconds_per_unit)
        .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow))?;
    non_zero(Duration::from_secs(secs))
}

fn non_zero(duration: Duration) -> AppResult<Duration> {
    if duration.is_zero() {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}
