use std::path::PathBuf;
use std::time::Duration;

use crate::args::{RunArgs, SendArgs};
use crate::error::ConfigError;
use crate::http::{AuthConventions, ClientSettings, DEFAULT_TIMEOUT, RequestOptions};

use super::types::ConfigFile;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_ENVIRONMENT: &str = "local";
pub const DEFAULT_FORM_ID: &str = "my-portfolio";
pub const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";

/// Fully resolved parameters for the `run` suite.
///
/// Precedence: CLI flag or env var, then config file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub base_url: String,
    pub environment: String,
    pub form_id: String,
    pub api_key: Option<String>,
    pub hmac_secret: Option<String>,
    pub timeout: Duration,
    pub artifacts_dir: PathBuf,
    pub load_results: Option<PathBuf>,
    pub export_days: u32,
    pub verbose: bool,
    pub conventions: AuthConventions,
}

impl RunSettings {
    #[must_use]
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions::default()
            .with_api_key(self.api_key.clone())
            .with_timeout(self.timeout)
            .with_verbose(self.verbose)
    }

    /// Same as [`RunSettings::request_options`] plus the HMAC secret.
    #[must_use]
    pub fn signed_request_options(&self) -> RequestOptions {
        self.request_options()
            .with_hmac_secret(self.hmac_secret.clone())
    }

    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            conventions: self.conventions,
            ..ClientSettings::default()
        }
    }
}

/// Merges `run` flags with the optional config file.
///
/// # Errors
///
/// Returns an error when the config sets `timeout_ms = 0`.
pub fn resolve_run_settings(
    args: &RunArgs,
    verbose: bool,
    config: Option<&ConfigFile>,
) -> Result<RunSettings, ConfigError> {
    let fallback = ConfigFile::default();
    let config = config.unwrap_or(&fallback);

    Ok(RunSettings {
        base_url: pick(
            args.base_url.as_deref(),
            config.base_url.as_deref(),
            DEFAULT_BASE_URL,
        ),
        environment: pick(
            args.environment.as_deref(),
            config.environment.as_deref(),
            DEFAULT_ENVIRONMENT,
        ),
        form_id: pick(
            args.form_id.as_deref(),
            config.form_id.as_deref(),
            DEFAULT_FORM_ID,
        ),
        api_key: args.api_key.clone().or_else(|| config.api_key.clone()),
        hmac_secret: args.hmac_secret.clone().or_else(|| config.hmac_secret.clone()),
        timeout: resolve_timeout(args.timeout, config)?,
        artifacts_dir: args
            .artifacts_dir
            .clone()
            .unwrap_or_else(|| artifacts_dir(Some(config))),
        load_results: args.load_results.clone(),
        export_days: args.export_days,
        verbose: verbose || config.verbose.unwrap_or(false),
        conventions: config.auth,
    })
}

/// Builds request options and auth conventions for `send`.
///
/// # Errors
///
/// Returns an error when the config sets `timeout_ms = 0`.
pub fn resolve_send_options(
    args: &SendArgs,
    verbose: bool,
    config: Option<&ConfigFile>,
) -> Result<(RequestOptions, AuthConventions), ConfigError> {
    let fallback = ConfigFile::default();
    let config = config.unwrap_or(&fallback);

    let options = RequestOptions::default()
        .with_api_key(args.api_key.clone().or_else(|| config.api_key.clone()))
        .with_hmac_secret(
            args.hmac_secret
                .clone()
                .or_else(|| config.hmac_secret.clone()),
        )
        .with_timeout(resolve_timeout(args.timeout, config)?)
        .with_verbose(verbose || config.verbose.unwrap_or(false));
    Ok((options, config.auth))
}

/// Artifacts directory from config, or the default.
#[must_use]
pub fn artifacts_dir(config: Option<&ConfigFile>) -> PathBuf {
    PathBuf::from(
        config
            .and_then(|config| config.artifacts_dir.as_deref())
            .unwrap_or(DEFAULT_ARTIFACTS_DIR),
    )
}

fn resolve_timeout(cli: Option<Duration>, config: &ConfigFile) -> Result<Duration, ConfigError> {
    if let Some(timeout) = cli {
        return Ok(timeout);
    }
    match config.timeout_ms {
        Some(0) => Err(ConfigError::TimeoutMustBePositive),
        Some(ms) => Ok(Duration::from_millis(ms)),
        None => Ok(DEFAULT_TIMEOUT),
    }
}

fn pick(cli: Option<&str>, config: Option<&str>, default: &str) -> String {
    cli.or(config).unwrap_or(default).to_owned()
}
