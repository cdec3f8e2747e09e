mod platform;
mod types;

pub use platform::Platform;
pub use types::{DEFAULT_REVISION, LocalArtifactInfo, Revision};
