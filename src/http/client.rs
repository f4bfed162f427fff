use std::collections::BTreeMap;

use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::args::HttpMethod;
use crate::error::{FailureKind, HttpError, NetworkFailure};

use super::options::{ApiKeyHeader, AuthConventions, ClientSettings, RequestOptions};
use super::outcome::{RequestOutcome, ResponseBody};
use super::signing::sign_payload;

const JSON_MIME: &str = "application/json";
const CSV_MIME: &str = "text/csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    /// Parse as JSON when the response declares a JSON content type.
    Negotiate,
    /// Always return the raw text.
    Text,
}

impl ReadMode {
    const fn accept(self) -> &'static str {
        match self {
            ReadMode::Negotiate => JSON_MIME,
            ReadMode::Text => CSV_MIME,
        }
    }
}

struct Exchange {
    status: u16,
    headers: BTreeMap<String, String>,
    content_type: String,
    text: String,
}

/// JSON HTTP client with optional API-key and HMAC authentication.
///
/// Each call makes at most one network attempt. Error statuses are returned
/// as normal outcomes; only transport problems become `NetworkFailure`.
#[derive(Debug, Clone)]
pub struct SignedHttpClient {
    client: Client,
    conventions: AuthConventions,
}

impl SignedHttpClient {
    /// Builds a client from the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(settings: &ClientSettings) -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;
        Ok(Self {
            client,
            conventions: settings.conventions,
        })
    }

    #[must_use]
    pub const fn conventions(&self) -> AuthConventions {
        self.conventions
    }

    /// Sends a request and normalises the response.
    ///
    /// # Errors
    ///
    /// Returns `NetworkFailure` when no response was obtained within the
    /// timeout, or when a response declared as JSON fails to parse.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<RequestOutcome, NetworkFailure> {
        self.execute(method, url, body, options, ReadMode::Negotiate)
            .await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`SignedHttpClient::send`].
    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<RequestOutcome, NetworkFailure> {
        self.send(HttpMethod::Post, url, Some(body), options).await
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// See [`SignedHttpClient::send`].
    pub async fn get_json(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<RequestOutcome, NetworkFailure> {
        self.send(HttpMethod::Get, url, None, options).await
    }

    /// Like [`SignedHttpClient::send`] but asks for CSV and always returns
    /// the body as raw text.
    ///
    /// # Errors
    ///
    /// Returns `NetworkFailure` when no response was obtained.
    pub async fn send_csv(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<RequestOutcome, NetworkFailure> {
        self.execute(method, url, body, options, ReadMode::Text)
            .await
    }

    /// `GET` a CSV document.
    ///
    /// # Errors
    ///
    /// Returns `NetworkFailure` when no response was obtained.
    pub async fn get_csv(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<RequestOutcome, NetworkFailure> {
        self.send_csv(HttpMethod::Get, url, None, options).await
    }

    /// `POST` a JSON body to an endpoint that answers with CSV.
    ///
    /// # Errors
    ///
    /// Returns `NetworkFailure` when no response was obtained.
    pub async fn post_csv(
        &self,
        url: &str,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<RequestOutcome, NetworkFailure> {
        self.send_csv(HttpMethod::Post, url, Some(body), options)
            .await
    }

    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
        options: &RequestOptions,
        mode: ReadMode,
    ) -> Result<RequestOutcome, NetworkFailure> {
        let started = Instant::now();

        // Serialised once: these exact bytes are both signed and sent.
        let raw_body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|err| request_failure(err.to_string(), started))?;

        let body_len = raw_body.as_ref().map_or(0, String::len);
        let (builder, header_names) = self
            .prepare(method, url, raw_body, options, mode)
            .map_err(|err| request_failure(err.to_string(), started))?;

        if options.verbose {
            info!(
                "{} {} headers=[{}] body={}B",
                method.as_str(),
                url,
                header_names.join(", "),
                body_len
            );
        }

        let exchange = tokio::time::timeout(options.timeout, run_exchange(builder)).await;
        let elapsed_ms = elapsed_ms(started);
        let exchange = match exchange {
            Ok(Ok(exchange)) => exchange,
            Ok(Err(err)) => {
                let failure = classify_failure(&err, elapsed_ms);
                log_failure(options, method, url, &failure);
                return Err(failure);
            }
            Err(_elapsed) => {
                let failure = NetworkFailure::new(
                    FailureKind::Timeout,
                    format!("no response within {}ms", options.timeout.as_millis()),
                    elapsed_ms,
                );
                log_failure(options, method, url, &failure);
                return Err(failure);
            }
        };

        let response_body = match mode {
            ReadMode::Negotiate if is_json_content_type(&exchange.content_type) => {
                let value = serde_json::from_str::<Value>(&exchange.text).map_err(|err| {
                    let failure = NetworkFailure::new(
                        FailureKind::InvalidJson,
                        format!("response declared JSON but did not parse: {}", err),
                        elapsed_ms,
                    );
                    log_failure(options, method, url, &failure);
                    failure
                })?;
                ResponseBody::Json(value)
            }
            ReadMode::Negotiate | ReadMode::Text => ResponseBody::Text(exchange.text),
        };

        if options.verbose {
            info!(
                "{} {} -> {} in {}ms ({} body)",
                method.as_str(),
                url,
                exchange.status,
                elapsed_ms,
                match response_body {
                    ResponseBody::Json(_) => "json",
                    ResponseBody::Text(_) => "text",
                }
            );
        } else {
            debug!("{} {} -> {}", method.as_str(), url, exchange.status);
        }

        Ok(RequestOutcome {
            status: exchange.status,
            body: response_body,
            headers: exchange.headers,
            elapsed_ms,
        })
    }

    fn prepare(
        &self,
        method: HttpMethod,
        url: &str,
        raw_body: Option<String>,
        options: &RequestOptions,
        mode: ReadMode,
    ) -> Result<(RequestBuilder, Vec<&'static str>), HttpError> {
        let parsed = Url::parse(url).map_err(|err| HttpError::InvalidUrl {
            url: url.to_owned(),
            source: err,
        })?;
        let mut header_names = vec!["Accept"];
        let mut builder = self
            .client
            .request(method.into(), parsed)
            .header(ACCEPT, mode.accept());

        if raw_body.is_some() {
            builder = builder.header(CONTENT_TYPE, JSON_MIME);
            header_names.push("Content-Type");
        }

        if let Some(api_key) = options.api_key() {
            builder = match self.conventions.api_key_header {
                ApiKeyHeader::XApiKey => {
                    header_names.push("X-Api-Key");
                    builder.header("X-Api-Key", api_key)
                }
                ApiKeyHeader::Bearer => {
                    header_names.push("Authorization");
                    builder.bearer_auth(api_key)
                }
            };
        }

        if let Some(secret) = options.hmac_secret() {
            let timestamp = Utc::now().timestamp();
            let signature = sign_payload(
                secret.as_bytes(),
                timestamp,
                raw_body.as_deref().unwrap_or_default(),
            )?;
            let (timestamp_header, signature_header) = self.conventions.signature_headers.names();
            builder = builder
                .header(timestamp_header, timestamp.to_string())
                .header(signature_header, signature);
            header_names.push(timestamp_header);
            header_names.push(signature_header);
        }

        if let Some(raw_body) = raw_body {
            builder = builder.body(raw_body);
        }

        Ok((builder, header_names))
    }
}

/// Resolves `path` against `base` the way a browser resolves a relative URL.
///
/// # Errors
///
/// Returns an error when `base` is not a valid URL or the join fails.
pub fn endpoint_url(base: &str, path: &str) -> Result<String, HttpError> {
    let base_url = Url::parse(base).map_err(|err| HttpError::InvalidUrl {
        url: base.to_owned(),
        source: err,
    })?;
    base_url
        .join(path)
        .map(String::from)
        .map_err(|err| HttpError::JoinUrlFailed {
            base: base.to_owned(),
            path: path.to_owned(),
            source: err,
        })
}

async fn run_exchange(builder: RequestBuilder) -> Result<Exchange, reqwest::Error> {
    let response = builder.send().await?;
    let status = response.status().as_u16();
    let headers = collect_headers(response.headers());
    let content_type = headers.get("content-type").cloned().unwrap_or_default();
    let text = response.text().await?;
    Ok(Exchange {
        status,
        headers,
        content_type,
        text,
    })
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_owned(), value.to_owned()))
        })
        .collect()
}

pub(super) fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == JSON_MIME || mime.ends_with("+json")
}

fn classify_failure(err: &reqwest::Error, elapsed_ms: u64) -> NetworkFailure {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() {
        FailureKind::Connect
    } else {
        FailureKind::Transport
    };
    NetworkFailure::new(kind, err.to_string(), elapsed_ms)
}

fn request_failure(message: String, started: Instant) -> NetworkFailure {
    NetworkFailure::new(FailureKind::Request, message, elapsed_ms(started))
}

fn log_failure(options: &RequestOptions, method: HttpMethod, url: &str, failure: &NetworkFailure) {
    if options.verbose {
        warn!("{} {} failed: {}", method.as_str(), url, failure);
    } else {
        debug!("{} {} failed: {}", method.as_str(), url, failure);
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
