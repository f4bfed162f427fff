use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::HttpStatusError;

/// Response body, parsed when the server declared JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text.as_str()),
            ResponseBody::Json(_) => None,
        }
    }

    /// Body as it would be printed: compact JSON or the raw text.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        match self {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestOutcome {
    pub status: u16,
    pub body: ResponseBody,
    pub headers: BTreeMap<String, String>,
    pub elapsed_ms: u64,
}

impl RequestOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Turns a non-2xx status into an error the caller can propagate.
    ///
    /// # Errors
    ///
    /// Returns `HttpStatusError` when the status is outside 200-299.
    pub fn ensure_success(&self) -> Result<(), HttpStatusError> {
        if self.is_success() {
            return Ok(());
        }
        Err(HttpStatusError {
            status: self.status,
            body: self.body.to_display_string(),
        })
    }

    /// Looks up a top-level field of a JSON body.
    #[must_use]
    pub fn json_field(&self, field: &str) -> Option<&Value> {
        self.body.as_json().and_then(|value| value.get(field))
    }
}
