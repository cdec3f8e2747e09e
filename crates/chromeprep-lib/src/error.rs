use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification used for exit codes and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    VersionParse,
    VersionTooOld,
    Persistence,
    InvalidInput,
    Internal,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Fetch => 1,
            ErrorKind::VersionParse => 3,
            ErrorKind::VersionTooOld => 4,
            ErrorKind::Persistence => 5,
            ErrorKind::InvalidInput => 64,
            ErrorKind::Internal => 70,
        }
    }
}

#[derive(Error, Debug)]
pub enum ChromePrepError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to download Chromium r{revision} from {url}: {reason:#}")]
    Fetch {
        revision: String,
        url: String,
        reason: eyre::Report,
    },

    #[error("Chromium executable for r{revision} not found at {path}")]
    ArtifactMissing { revision: String, path: PathBuf },

    #[error("Failed to run {path}: {reason}")]
    VersionProbe { path: PathBuf, reason: String },

    #[error("Could not parse Chromium version from output: {output:?}")]
    VersionParse { output: String },

    #[error("Chromium version {found} is not supported, version >= {minimum} is required")]
    VersionTooOld { found: u32, minimum: u32 },

    #[error("Failed to write Chromium configuration to {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("Invalid arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("Invalid download host {host}: {reason}")]
    InvalidDownloadHost { host: String, reason: String },

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] opendal::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

impl ChromePrepError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChromePrepError::Fetch { .. } | ChromePrepError::Storage(_) => ErrorKind::Fetch,
            ChromePrepError::ArtifactMissing { .. }
            | ChromePrepError::VersionProbe { .. }
            | ChromePrepError::VersionParse { .. } => ErrorKind::VersionParse,
            ChromePrepError::VersionTooOld { .. } => ErrorKind::VersionTooOld,
            ChromePrepError::Persistence { .. } => ErrorKind::Persistence,
            ChromePrepError::Config(_)
            | ChromePrepError::CliArgumentValidation { .. }
            | ChromePrepError::InvalidDownloadHost { .. } => ErrorKind::InvalidInput,
            ChromePrepError::Io(_) | ChromePrepError::Json(_) | ChromePrepError::Unexpected(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}
