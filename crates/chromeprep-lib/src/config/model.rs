use crate::output::JsonFileSink;
use crate::revision::{Platform, Revision};
use crate::verification::MIN_CHROMIUM_MAJOR_VERSION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DOWNLOAD_HOST: &str = "https://storage.googleapis.com";
pub const DEFAULT_INSTALL_DIR: &str = "temp/chrome";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub revision: Option<Revision>,
    pub download_host: String,
    pub install_dir: PathBuf,
    pub min_major_version: u32,
    #[serde(default)]
    pub platform: Option<Platform>,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            revision: None,
            download_host: DEFAULT_DOWNLOAD_HOST.to_string(),
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            min_major_version: MIN_CHROMIUM_MAJOR_VERSION,
            platform: None,
            output: OutputConfig {
                path: PathBuf::from(JsonFileSink::DEFAULT_FILE_NAME),
            },
        }
    }
}
