use crate::download::Fetcher;
use crate::error::ChromePrepError;
use crate::output::{ConfigSink, VerifiedArtifactConfig};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::revision::{LocalArtifactInfo, Revision};
use crate::store::LocalStore;
use crate::verification::{VersionProbe, check_version};

/// How [`ArtifactResolver::ensure_local`] obtained the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    Cached,
    Downloaded,
}

pub struct ArtifactResolver<S, F, P> {
    store: S,
    fetcher: F,
    probe: P,
}

impl<S, F, P> ArtifactResolver<S, F, P>
where
    S: LocalStore,
    F: Fetcher,
    P: VersionProbe,
{
    pub fn new(store: S, fetcher: F, probe: P) -> Self {
        Self {
            store,
            fetcher,
            probe,
        }
    }

    pub fn resolve(&self, revision: &Revision) -> LocalArtifactInfo {
        self.store.revision_info(revision)
    }

    /// Returns the local artifact for `revision`, downloading it on a miss.
    ///
    /// The fetcher is called at most once; its failure is returned as is.
    pub async fn ensure_local(
        &self,
        revision: &Revision,
        progress_sink: &mut dyn ProgressSink,
    ) -> Result<(LocalArtifactInfo, Acquisition), ChromePrepError> {
        let info = self.resolve(revision);
        if info.present {
            tracing::info!(
                "Chromium r{} found local at {}",
                revision,
                info.executable_path.display()
            );
            return Ok((info, Acquisition::Cached));
        }

        tracing::debug!(revision = %revision, "Chromium not found locally, downloading");
        let mut tracker = ProgressTracker::new();
        let mut on_progress = tracker.adapter(progress_sink);
        let info = self.fetcher.fetch(revision, &mut on_progress).await?;
        Ok((info, Acquisition::Downloaded))
    }

    pub async fn verify(
        &self,
        info: &LocalArtifactInfo,
        min_major_version: u32,
    ) -> Result<VerifiedArtifactConfig, ChromePrepError> {
        if !info.present {
            return Err(ChromePrepError::ArtifactMissing {
                revision: info.revision.to_string(),
                path: info.executable_path.clone(),
            });
        }

        let output = self.probe.query_version(&info.executable_path).await?;
        let version = check_version(&output, min_major_version)?;
        tracing::debug!(
            revision = %info.revision,
            version = %version.full,
            "Chromium version accepted"
        );

        Ok(VerifiedArtifactConfig::new(
            info.executable_path.clone(),
            info.revision.clone(),
            version.full,
        ))
    }

    pub async fn persist(
        &self,
        config: &VerifiedArtifactConfig,
        sink: &mut impl ConfigSink,
    ) -> Result<(), ChromePrepError> {
        sink.write(config).await
    }
}
