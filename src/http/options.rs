use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Header carrying the API key. A deployment uses exactly one of these.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ApiKeyHeader {
    #[default]
    #[serde(alias = "x_api_key")]
    XApiKey,
    Bearer,
}

/// Header pair carrying the HMAC timestamp and signature.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureHeaders {
    /// `X-Timestamp` / `X-Signature`
    #[default]
    Standard,
    /// `X-HMAC-Timestamp` / `X-HMAC-Signature`
    #[serde(alias = "hmac_prefixed")]
    HmacPrefixed,
}

impl SignatureHeaders {
    #[must_use]
    pub const fn names(self) -> (&'static str, &'static str) {
        match self {
            SignatureHeaders::Standard => ("X-Timestamp", "X-Signature"),
            SignatureHeaders::HmacPrefixed => ("X-HMAC-Timestamp", "X-HMAC-Signature"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct AuthConventions {
    #[serde(default)]
    pub api_key_header: ApiKeyHeader,
    #[serde(default)]
    pub signature_headers: SignatureHeaders,
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub conventions: AuthConventions,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            conventions: AuthConventions::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: concat!("stepcheck/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Per-request options. Empty strings count as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub api_key: Option<String>,
    pub hmac_secret: Option<String>,
    pub timeout: Duration,
    pub verbose: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            hmac_secret: None,
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    #[must_use]
    pub fn with_hmac_secret(mut self, hmac_secret: Option<String>) -> Self {
        self.hmac_secret = hmac_secret;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    #[must_use]
    pub fn hmac_secret(&self) -> Option<&str> {
        non_empty(self.hmac_secret.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
