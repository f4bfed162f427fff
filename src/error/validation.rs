use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid step status '{value}'. Use PASS, FAIL, or SKIP.")]
    InvalidStepStatus { value: String },
    #[error("Unknown link kind '{value}'. Use export-csv, mail-capture-html, load-test-html, load-test-json, or raw-export-json.")]
    InvalidLinkKind { value: String },
    #[error("Invalid info JSON: {source}")]
    InvalidInfoJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid request body JSON: {source}")]
    InvalidBodyJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid duration unit '{unit}'. Use ms, s, m, or h.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration is too large.")]
    DurationOverflow,
    #[error("Duration must be > 0.")]
    DurationZero,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
