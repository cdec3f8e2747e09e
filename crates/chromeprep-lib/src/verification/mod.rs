mod version;
mod version_probe;

pub use version::{
    ChromiumVersion, MIN_CHROMIUM_MAJOR_VERSION, check_version, parse_chromium_version,
};
pub use version_probe::{CommandProbe, VersionProbe};
