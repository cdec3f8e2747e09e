use crate::error::ChromePrepError;
use crate::revision::Revision;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Record of a Chromium executable that passed verification.
///
/// Fields are private: outside this crate a value comes either from
/// verification or from reading back a file written earlier.
///
/// ```compile_fail
/// use chromeprep_lib::output::VerifiedArtifactConfig;
///
/// let config = VerifiedArtifactConfig {
///     executable_path: "/not/verified".into(),
///     revision: None,
///     version: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedArtifactConfig {
    executable_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision: Option<Revision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl VerifiedArtifactConfig {
    pub(crate) fn new(executable_path: PathBuf, revision: Revision, version: String) -> Self {
        Self {
            executable_path,
            revision: Some(revision),
            version: Some(version),
        }
    }

    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    /// Full version reported by the executable, e.g. `90.0.4430.0`.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Durable destination for the verified configuration.
pub trait ConfigSink {
    fn write(
        &mut self,
        config: &VerifiedArtifactConfig,
    ) -> impl Future<Output = Result<(), ChromePrepError>>;
}

/// Writes the configuration as JSON, replacing the file if it exists.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub const DEFAULT_FILE_NAME: &'static str = "chrome.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(path: &Path) -> Result<VerifiedArtifactConfig, ChromePrepError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn persistence_error(&self, reason: impl ToString) -> ChromePrepError {
        ChromePrepError::Persistence {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl ConfigSink for JsonFileSink {
    async fn write(&mut self, config: &VerifiedArtifactConfig) -> Result<(), ChromePrepError> {
        let content =
            serde_json::to_string(config).map_err(|e| self.persistence_error(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.persistence_error(e))?;
        }

        // Write next to the target and rename so readers never see a partial file.
        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| self.persistence_error(e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.persistence_error(e))?;

        tracing::debug!(path = %self.path.display(), "Wrote Chromium configuration");
        Ok(())
    }
}
