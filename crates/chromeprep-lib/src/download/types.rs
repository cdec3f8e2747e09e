use crate::error::ChromePrepError;
use crate::revision::{LocalArtifactInfo, Revision};

/// Downloads and unpacks a revision into the local store.
///
/// `on_progress` receives cumulative `(downloaded_bytes, total_bytes)` pairs
/// on the caller's task while the returned future is being polled.
pub trait Fetcher {
    fn fetch(
        &self,
        revision: &Revision,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> impl Future<Output = Result<LocalArtifactInfo, ChromePrepError>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FetchOptions {
    /// Keep the downloaded archive next to the extracted folder.
    pub keep_archive: bool,
}
