use serde::Deserialize;

use crate::http::AuthConventions;

/// Contents of `stepcheck.toml` / `stepcheck.json`. Every field is optional.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    #[serde(alias = "env")]
    pub environment: Option<String>,
    pub form_id: Option<String>,
    pub api_key: Option<String>,
    pub hmac_secret: Option<String>,
    pub timeout_ms: Option<u64>,
    pub artifacts_dir: Option<String>,
    pub verbose: Option<bool>,
    #[serde(default)]
    pub auth: AuthConventions,
}
