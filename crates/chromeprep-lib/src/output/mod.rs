mod chrome_config;

pub use chrome_config::{ConfigSink, JsonFileSink, VerifiedArtifactConfig};
