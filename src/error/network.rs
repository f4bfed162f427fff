use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    Transport,
    InvalidJson,
    Request,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Transport => "transport",
            FailureKind::InvalidJson => "invalid json",
            FailureKind::Request => "request",
        };
        f.write_str(label)
    }
}

/// No usable response was obtained for a request.
#[derive(Debug, Clone, Error)]
#[error("Network failure ({kind}) after {elapsed_ms}ms: {message}")]
pub struct NetworkFailure {
    pub kind: FailureKind,
    pub message: String,
    pub elapsed_ms: u64,
}

impl NetworkFailure {
    #[must_use]
    pub const fn new(kind: FailureKind, message: String, elapsed_ms: u64) -> Self {
        Self {
            kind,
            message,
            elapsed_ms,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }
}
