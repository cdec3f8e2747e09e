//! Download progress reporting.
//!
//! Fetchers report cumulative `(downloaded, total)` pairs. A [`ProgressTracker`]
//! owned by a single fetch session turns them into per-tick increments for
//! sinks that render bars.

use crate::revision::Revision;

/// Cumulative progress of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
}

/// Receives progress of a fetch, once per chunk.
pub trait ProgressSink {
    fn on_progress(&mut self, progress: DownloadProgress, delta: u64);
}

impl<F: FnMut(DownloadProgress, u64)> ProgressSink for F {
    fn on_progress(&mut self, progress: DownloadProgress, delta: u64) {
        self(progress, delta)
    }
}

/// Delta computation state for one fetch session.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last_downloaded: u64,
    reported: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the increment since the previous call.
    ///
    /// Never negative, and the sum of all returned increments never exceeds
    /// `total_bytes` (when it is known, i.e. non-zero).
    pub fn advance(&mut self, downloaded_bytes: u64, total_bytes: u64) -> u64 {
        let mut delta = downloaded_bytes.saturating_sub(self.last_downloaded);
        self.last_downloaded = self.last_downloaded.max(downloaded_bytes);
        if total_bytes > 0 {
            delta = delta.min(total_bytes.saturating_sub(self.reported));
        }
        self.reported += delta;
        delta
    }

    pub fn reported(&self) -> u64 {
        self.reported
    }

    /// Wraps `sink` into the callback shape fetchers expect.
    pub fn adapter<'a>(&'a mut self, sink: &'a mut dyn ProgressSink) -> impl FnMut(u64, u64) + 'a {
        move |downloaded_bytes, total_bytes| {
            let delta = self.advance(downloaded_bytes, total_bytes);
            sink.on_progress(
                DownloadProgress {
                    downloaded_bytes,
                    total_bytes,
                },
                delta,
            );
        }
    }
}

pub fn to_megabytes(bytes: u64) -> String {
    let mb = bytes as f64 / 1024.0 / 1024.0;
    format!("{} Mb", (mb * 10.0).round() / 10.0)
}

/// Logs download progress through `tracing` in 10% steps.
#[derive(Debug)]
pub struct TracingProgressSink {
    revision: Revision,
    started: bool,
    ticked: u64,
    last_step: u64,
}

impl TracingProgressSink {
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            started: false,
            ticked: 0,
            last_step: 0,
        }
    }
}

impl ProgressSink for TracingProgressSink {
    fn on_progress(&mut self, progress: DownloadProgress, delta: u64) {
        if !self.started {
            self.started = true;
            tracing::info!(
                "Downloading Chromium r{} - {}",
                self.revision,
                to_megabytes(progress.total_bytes)
            );
        }
        self.ticked += delta;
        if progress.total_bytes == 0 {
            return;
        }

        let step = (self.ticked * 10 / progress.total_bytes).min(10);
        if step > self.last_step {
            self.last_step = step;
            tracing::info!(
                revision = %self.revision,
                downloaded = %to_megabytes(self.ticked),
                "{}%",
                step * 10
            );
        }
    }
}
