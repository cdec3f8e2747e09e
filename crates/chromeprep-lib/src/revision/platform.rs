use super::Revision;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Last revision whose Windows archive was still named `chrome-win32`.
const LAST_WIN32_ARCHIVE_REVISION: u64 = 591479;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Mac,
    Win32,
    Win64,
}

impl Platform {
    /// Platform of the running host, if Chromium snapshots exist for it.
    pub fn current() -> Option<Self> {
        match (std::env::consts::OS, std::env::consts::ARCH) {
            ("linux", _) => Some(Platform::Linux),
            ("macos", _) => Some(Platform::Mac),
            ("windows", "x86_64" | "aarch64") => Some(Platform::Win64),
            ("windows", _) => Some(Platform::Win32),
            _ => None,
        }
    }

    /// Folder name under `chromium-browser-snapshots` on the download host.
    pub fn snapshot_folder(self) -> &'static str {
        match self {
            Platform::Linux => "Linux_x64",
            Platform::Mac => "Mac",
            Platform::Win32 => "Win",
            Platform::Win64 => "Win_x64",
        }
    }

    /// Archive base name, also the top-level directory inside the archive.
    pub fn archive_name(self, revision: &Revision) -> &'static str {
        match self {
            Platform::Linux => "chrome-linux",
            Platform::Mac => "chrome-mac",
            Platform::Win32 | Platform::Win64 => match revision.number() {
                Some(n) if n <= LAST_WIN32_ARCHIVE_REVISION => "chrome-win32",
                _ => "chrome-win",
            },
        }
    }

    pub fn archive_file_name(self, revision: &Revision) -> String {
        format!("{}.zip", self.archive_name(revision))
    }

    /// Path of the archive relative to the download host root.
    pub fn download_path(self, revision: &Revision) -> String {
        format!(
            "chromium-browser-snapshots/{}/{}/{}",
            self.snapshot_folder(),
            revision,
            self.archive_file_name(revision)
        )
    }

    pub fn folder_path(self, install_dir: &Path, revision: &Revision) -> PathBuf {
        install_dir.join(format!("{self}-{revision}"))
    }

    pub fn executable_path(self, folder_path: &Path, revision: &Revision) -> PathBuf {
        let archive = folder_path.join(self.archive_name(revision));
        match self {
            Platform::Linux => archive.join("chrome"),
            Platform::Mac => archive
                .join("Chromium.app")
                .join("Contents")
                .join("MacOS")
                .join("Chromium"),
            Platform::Win32 | Platform::Win64 => archive.join("chrome.exe"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Linux => "linux",
            Platform::Mac => "mac",
            Platform::Win32 => "win32",
            Platform::Win64 => "win64",
        };
        f.write_str(name)
    }
}
