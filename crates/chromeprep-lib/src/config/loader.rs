use super::Config;
use super::model::{DEFAULT_DOWNLOAD_HOST, DEFAULT_INSTALL_DIR};
use crate::env::EnvLookup;
use crate::error::ChromePrepError;
use crate::output::JsonFileSink;
use crate::verification::MIN_CHROMIUM_MAJOR_VERSION;
use config::Config as ConfigBuilder;

/// Looked up next to the working directory when no config file is given.
pub const DEFAULT_CONFIG_NAME: &str = "chromeprep";

pub const REVISION_VAR: &str = "PUPPETEER_CHROMIUM_REVISION";

/// Download host overrides in decreasing precedence.
pub const DOWNLOAD_HOST_VARS: [&str; 3] = [
    "PUPPETEER_DOWNLOAD_HOST",
    "npm_config_puppeteer_download_host",
    "npm_package_config_puppeteer_download_host",
];

/// Builds the configuration from defaults, the config file and the environment.
///
/// An explicitly given `config_path` must exist; the default one is optional.
pub fn load_config(
    config_path: Option<&str>,
    env: &impl EnvLookup,
) -> Result<Config, ChromePrepError> {
    let file_source = match config_path {
        Some(path) => config::File::with_name(path),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let mut config_builder = ConfigBuilder::builder()
        .set_default("download_host", DEFAULT_DOWNLOAD_HOST)?
        .set_default("install_dir", DEFAULT_INSTALL_DIR)?
        .set_default("min_major_version", i64::from(MIN_CHROMIUM_MAJOR_VERSION))?
        .set_default("output.path", JsonFileSink::DEFAULT_FILE_NAME)?
        .add_source(file_source);

    if let Some(revision) = env.non_empty(REVISION_VAR) {
        tracing::debug!(revision = %revision, "Using revision from {}", REVISION_VAR);
        config_builder = config_builder.set_override("revision", revision)?;
    }
    if let Some(host) = env.first_of(&DOWNLOAD_HOST_VARS) {
        tracing::debug!(host = %host, "Using download host from environment");
        config_builder = config_builder.set_override("download_host", host)?;
    }

    config_builder.build()?.try_deserialize().map_err(Into::into)
}
