use super::extract::extract_zip;
use super::types::{FetchOptions, Fetcher};
use crate::error::ChromePrepError;
use crate::revision::{LocalArtifactInfo, Revision};
use crate::store::{FsStore, LocalStore};
use eyre::{Result, WrapErr, eyre};
use futures::StreamExt;
use opendal::Operator;
use opendal::layers::TracingLayer;
use opendal::services::Http;
use std::path::Path;

fn build_http_operator(base_url: &str) -> Result<Operator> {
    // Paths of snapshot archives are fetched relative to the download host.
    // No retry layer: a failed download is reported to the operator instead.
    let builder = Http::default().endpoint(base_url);

    let op = Operator::new(builder)?.layer(TracingLayer).finish();
    Ok(op)
}

/// Fetches Chromium snapshot archives over HTTP and unpacks them into an [`FsStore`].
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    store: FsStore,
    operator: Operator,
    options: FetchOptions,
}

impl HttpFetcher {
    pub fn new(store: FsStore, options: FetchOptions) -> Result<Self, ChromePrepError> {
        let operator =
            build_http_operator(store.download_host().as_str().trim_end_matches('/'))?;
        Ok(Self {
            store,
            operator,
            options,
        })
    }

    async fn download_archive(
        &self,
        rel_path: &str,
        archive_path: &Path,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<u64> {
        let total_bytes = self
            .operator
            .stat(rel_path)
            .await
            .wrap_err_with(|| format!("Failed to stat {rel_path}"))?
            .content_length();
        on_progress(0, total_bytes);

        let mut reader = self
            .operator
            .reader(rel_path)
            .await
            .wrap_err_with(|| format!("Failed to create reader for {rel_path}"))?
            .into_stream(..)
            .await
            .wrap_err_with(|| format!("Failed to create reader for {rel_path}"))?;

        let file = tokio::fs::File::create(archive_path)
            .await
            .wrap_err_with(|| format!("Failed to create output file: {}", archive_path.display()))?;
        let mut writer = tokio::io::BufWriter::new(file);

        let mut downloaded_bytes = 0u64;
        while let Some(chunk) = reader.next().await {
            let buffer = chunk
                .wrap_err_with(|| format!("Failed to read from {rel_path}"))?
                .to_bytes();

            tokio::io::AsyncWriteExt::write_all(&mut writer, &buffer)
                .await
                .wrap_err_with(|| format!("Failed to write to {}", archive_path.display()))?;

            downloaded_bytes += buffer.len() as u64;
            on_progress(downloaded_bytes, total_bytes);
        }

        tokio::io::AsyncWriteExt::flush(&mut writer)
            .await
            .wrap_err_with(|| format!("Failed to flush {}", archive_path.display()))?;

        if total_bytes > 0 && downloaded_bytes != total_bytes {
            return Err(eyre!(
                "Downloaded {downloaded_bytes} bytes, expected {total_bytes}"
            ));
        }
        Ok(downloaded_bytes)
    }

    async fn download_and_extract(
        &self,
        revision: &Revision,
        info: &LocalArtifactInfo,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<()> {
        let install_dir = self.store.install_dir();
        tokio::fs::create_dir_all(install_dir)
            .await
            .wrap_err_with(|| format!("Failed to create directory: {}", install_dir.display()))?;

        let platform = self.store.platform();
        let rel_path = platform.download_path(revision);
        let archive_path = install_dir.join(platform.archive_file_name(revision));

        tracing::info!(revision = %revision, url = %info.url, output = %archive_path.display(), "Downloading");
        let size = self
            .download_archive(&rel_path, &archive_path, on_progress)
            .await?;

        tracing::debug!(revision = %revision, bytes = size, "Extracting");
        let folder_path = info.folder_path.clone();
        let archive = archive_path.clone();
        tokio::task::spawn_blocking(move || extract_zip(&archive, &folder_path))
            .await
            .wrap_err("Extraction task failed")??;

        if !self.options.keep_archive {
            tokio::fs::remove_file(&archive_path)
                .await
                .wrap_err_with(|| format!("Failed to remove {}", archive_path.display()))?;
        }
        Ok(())
    }

    async fn clean_up(&self, revision: &Revision, info: &LocalArtifactInfo) {
        let archive_path = self
            .store
            .install_dir()
            .join(self.store.platform().archive_file_name(revision));
        for result in [
            tokio::fs::remove_file(&archive_path).await,
            tokio::fs::remove_dir_all(&info.folder_path).await,
        ] {
            if let Err(err) = result
                && err.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!("Failed to clean up after failed download: {}", err);
            }
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        revision: &Revision,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<LocalArtifactInfo, ChromePrepError> {
        let info = self.store.revision_info(revision);

        let result = match self.download_and_extract(revision, &info, on_progress).await {
            Ok(()) => {
                let refreshed = self.store.revision_info(revision);
                if refreshed.present {
                    Ok(refreshed)
                } else {
                    Err(eyre!(
                        "Archive did not contain {}",
                        refreshed.executable_path.display()
                    ))
                }
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(info) => {
                tracing::info!(revision = %revision, output = %info.folder_path.display(), "Downloaded and extracted");
                Ok(info)
            }
            Err(reason) => {
                self.clean_up(revision, &info).await;
                Err(ChromePrepError::Fetch {
                    revision: revision.to_string(),
                    url: info.url,
                    reason,
                })
            }
        }
    }
}
