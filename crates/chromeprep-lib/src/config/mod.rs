mod loader;
mod model;

pub use loader::{DEFAULT_CONFIG_NAME, DOWNLOAD_HOST_VARS, REVISION_VAR, load_config};
pub use model::{Config, DEFAULT_DOWNLOAD_HOST, DEFAULT_INSTALL_DIR, OutputConfig};
