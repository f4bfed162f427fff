//! Authenticated HTTP client used by the test steps.
mod client;
mod options;
mod outcome;
mod signing;


pub use client::{SignedHttpClient, endpoint_url};
pub use options::{
    ApiKeyHeader, AuthConventions, ClientSettings, DEFAULT_TIMEOUT, RequestOptions,
    SignatureHeaders,
};
pub use outcome::{RequestOutcome, ResponseBody};
pub use signing::sign_payload;
