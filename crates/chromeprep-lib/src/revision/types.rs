use crate::error::ChromePrepError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Chromium revision bundled with this release when nothing overrides it.
pub const DEFAULT_REVISION: &str = "706915";

/// Identifies which Chromium snapshot build is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Revision(String);

impl Revision {
    pub fn new(value: impl Into<String>) -> Result<Self, ChromePrepError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ChromePrepError::CliArgumentValidation {
                details: "Chromium revision must not be empty.".to_string(),
            });
        }
        if trimmed.contains(['/', '\\']) {
            return Err(ChromePrepError::CliArgumentValidation {
                details: format!("Chromium revision {trimmed:?} must not contain path separators."),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the revision, when it is a plain snapshot number.
    pub fn number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self(DEFAULT_REVISION.to_string())
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Revision {
    type Error = ChromePrepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Revision> for String {
    fn from(revision: Revision) -> Self {
        revision.0
    }
}

/// A candidate Chromium installation in the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifactInfo {
    pub revision: Revision,
    /// Whether the executable exists on disk.
    pub present: bool,
    pub executable_path: PathBuf,
    /// Folder the revision is (or would be) extracted into.
    pub folder_path: PathBuf,
    /// Where the archive for this revision is downloaded from.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_trims_whitespace() {
        let revision = Revision::new(" 706915\n").unwrap();
        assert_eq!(revision.as_str(), "706915");
        assert_eq!(revision.number(), Some(706915));
    }

    #[test]
    fn test_revision_rejects_empty() {
        assert!(Revision::new("   ").is_err());
    }

    #[test]
    fn test_revision_rejects_path_separators() {
        assert!(Revision::new("../706915").is_err());
        assert!(Revision::new("a\\b").is_err());
    }

    #[test]
    fn test_revision_deserializes_from_string() {
        let revision: Revision = serde_json::from_str("\"818858\"").unwrap();
        assert_eq!(revision.to_string(), "818858");
        assert!(serde_json::from_str::<Revision>("\"\"").is_err());
    }
}
