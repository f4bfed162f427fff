//! Optional config file and its merge with CLI flags.
mod loader;
mod resolve;
pub mod types;


pub use loader::{load_config, load_config_file};
pub use resolve::{
    DEFAULT_ARTIFACTS_DIR, DEFAULT_BASE_URL, DEFAULT_ENVIRONMENT, DEFAULT_FORM_ID, RunSettings,
    artifacts_dir, resolve_run_settings, resolve_send_options,
};
pub use types::ConfigFile;
