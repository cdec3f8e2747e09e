use crate::revision::{LocalArtifactInfo, Platform, Revision};
use std::path::{Path, PathBuf};
use url::Url;

/// Lookup of already installed revisions.
pub trait LocalStore {
    fn revision_info(&self, revision: &Revision) -> LocalArtifactInfo;
}

/// Revisions extracted under `install_dir/<platform>-<revision>`.
#[derive(Debug, Clone)]
pub struct FsStore {
    install_dir: PathBuf,
    platform: Platform,
    download_host: Url,
}

impl FsStore {
    pub fn new(install_dir: impl Into<PathBuf>, platform: Platform, download_host: Url) -> Self {
        Self {
            install_dir: install_dir.into(),
            platform,
            download_host,
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn download_host(&self) -> &Url {
        &self.download_host
    }

    pub fn download_url(&self, revision: &Revision) -> String {
        format!(
            "{}/{}",
            self.download_host.as_str().trim_end_matches('/'),
            self.platform.download_path(revision)
        )
    }
}

impl LocalStore for FsStore {
    fn revision_info(&self, revision: &Revision) -> LocalArtifactInfo {
        let folder_path = self.platform.folder_path(&self.install_dir, revision);
        let executable_path = self.platform.executable_path(&folder_path, revision);
        let present = executable_path.is_file();
        tracing::debug!(
            revision = %revision,
            path = %executable_path.display(),
            present,
            "Looked up local Chromium"
        );

        LocalArtifactInfo {
            revision: revision.clone(),
            present,
            executable_path,
            folder_path,
            url: self.download_url(revision),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path, host: &str) -> FsStore {
        FsStore::new(dir, Platform::Linux, Url::parse(host).unwrap())
    }

    #[test]
    fn test_missing_revision_is_not_present() {
        let temp_dir = tempfile::tempdir().unwrap();
        let info = store(temp_dir.path(), "https://storage.googleapis.com")
            .revision_info(&Revision::new("706915").unwrap());

        assert!(!info.present);
        assert_eq!(info.folder_path, temp_dir.path().join("linux-706915"));
        assert_eq!(
            info.url,
            "https://storage.googleapis.com/chromium-browser-snapshots/Linux_x64/706915/chrome-linux.zip"
        );
    }

    #[test]
    fn test_existing_executable_is_present() {
        let temp_dir = tempfile::tempdir().unwrap();
        let exe_dir = temp_dir.path().join("linux-706915").join("chrome-linux");
        std::fs::create_dir_all(&exe_dir).unwrap();
        std::fs::write(exe_dir.join("chrome"), b"").unwrap();

        let info = store(temp_dir.path(), "https://mirror.example.com/")
            .revision_info(&Revision::new("706915").unwrap());

        assert!(info.present);
        assert_eq!(info.executable_path, exe_dir.join("chrome"));
        assert!(info.url.starts_with("https://mirror.example.com/chromium-browser-snapshots/"));
    }

    #[test]
    fn test_folder_without_executable_is_not_present() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("linux-706915").join("chrome-linux")).unwrap();

        let info = store(temp_dir.path(), "https://storage.googleapis.com")
            .revision_info(&Revision::new("706915").unwrap());
        assert!(!info.present);
    }
}
