use chromeprep_lib::ChromePrepError;
use chromeprep_lib::download::Fetcher;
use chromeprep_lib::revision::{LocalArtifactInfo, Platform, Revision};
use chromeprep_lib::store::{FsStore, LocalStore};
use eyre::Result;
use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

pub const TEST_REVISION: &str = "706915";

pub fn fake_chromium_script(version_output: &str) -> String {
    format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  echo \"{version_output}\"\nelse\n  exit 1\nfi\n"
    )
}

/// Writes an executable shell script that answers `--version` like Chromium.
pub fn write_fake_chromium(path: &Path, version_output: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, fake_chromium_script(version_output))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

pub fn setup_test_environment() -> Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    std::fs::create_dir_all(temp_dir.path().join("temp").join("chrome"))?;
    Ok(temp_dir)
}

pub fn install_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("temp").join("chrome")
}

pub fn create_test_store(temp_dir: &TempDir, download_host: &str) -> Result<FsStore> {
    Ok(FsStore::new(
        install_dir(temp_dir),
        Platform::Linux,
        Url::parse(download_host)?,
    ))
}

/// Places a fake Chromium where the store expects `revision`.
pub fn install_fake_revision(store: &FsStore, revision: &str, version_output: &str) -> Result<PathBuf> {
    let info = store.revision_info(&Revision::new(revision)?);
    write_fake_chromium(&info.executable_path, version_output)?;
    Ok(info.executable_path)
}

/// Builds a snapshot archive as served by the download host.
pub fn build_snapshot_archive(version_output: &str) -> Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    writer.add_directory("chrome-linux/", options)?;
    writer.start_file("chrome-linux/chrome", options.unix_permissions(0o755))?;
    writer.write_all(fake_chromium_script(version_output).as_bytes())?;
    writer.start_file("chrome-linux/resources.pak", options.unix_permissions(0o644))?;
    writer.write_all(&[0u8; 4096])?;
    Ok(writer.finish()?.into_inner())
}

/// Fetcher that writes a fake Chromium instead of downloading one.
pub struct ScriptFetcher {
    pub store: FsStore,
    pub version_output: String,
    pub total_bytes: u64,
    pub calls: Cell<usize>,
}

impl ScriptFetcher {
    pub fn new(store: FsStore, version_output: &str) -> Self {
        Self {
            store,
            version_output: version_output.to_string(),
            total_bytes: 4 * 1024,
            calls: Cell::new(0),
        }
    }
}

impl Fetcher for ScriptFetcher {
    async fn fetch(
        &self,
        revision: &Revision,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> Result<LocalArtifactInfo, ChromePrepError> {
        self.calls.set(self.calls.get() + 1);
        for downloaded in (0..=self.total_bytes).step_by(1024) {
            on_progress(downloaded, self.total_bytes);
        }
        let info = self.store.revision_info(revision);
        write_fake_chromium(&info.executable_path, &self.version_output)?;
        Ok(self.store.revision_info(revision))
    }
}

fn requested_range(request: &str, len: usize) -> Option<(usize, usize)> {
    let value = request.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("range")
            .then(|| value.trim().to_string())
    })?;
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    let start: usize = start.parse().ok()?;
    let end: usize = match end {
        "" => len.checked_sub(1)?,
        end => end.parse::<usize>().ok()?.min(len.checked_sub(1)?),
    };
    (start <= end).then_some((start, end))
}

/// Serves `body` at `rel_path` over plain HTTP/1.1 and returns the base URL.
///
/// Supports `HEAD`, `GET` and single `Range` requests, one request per connection.
pub async fn serve_file(rel_path: String, body: Vec<u8>) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            let rel_path = rel_path.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await?;
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                }

                let request = String::from_utf8_lossy(&request).into_owned();
                let mut parts = request.split_whitespace();
                let method = parts.next().unwrap_or_default();
                let path = parts.next().unwrap_or_default();

                if path.trim_start_matches('/') != rel_path {
                    socket
                        .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                        .await?;
                    return socket.shutdown().await;
                }

                let (status, payload, content_range) = match requested_range(&request, body.len()) {
                    Some((start, end)) => (
                        "206 Partial Content",
                        &body[start..=end],
                        format!("Content-Range: bytes {start}-{end}/{}\r\n", body.len()),
                    ),
                    None => ("200 OK", &body[..], String::new()),
                };
                let header = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/zip\r\nContent-Length: {}\r\n{content_range}Accept-Ranges: bytes\r\nConnection: close\r\n\r\n",
                    payload.len()
                );
                socket.write_all(header.as_bytes()).await?;
                if method == "GET" {
                    socket.write_all(payload).await?;
                }
                socket.shutdown().await
            });
        }
    });

    Ok(format!("http://{addr}"))
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("chromeprep_lib=debug,chromeprep_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
