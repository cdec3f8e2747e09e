use crate::error::ChromePrepError;
use std::path::Path;
use tokio::process::Command;

/// Runs an executable and returns what it reports about its version.
pub trait VersionProbe {
    fn query_version(
        &self,
        executable_path: &Path,
    ) -> impl Future<Output = Result<String, ChromePrepError>>;
}

/// Runs `<executable> --version` as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandProbe;

impl CommandProbe {
    pub const VERSION_FLAG: &'static str = "--version";
}

impl VersionProbe for CommandProbe {
    async fn query_version(&self, executable_path: &Path) -> Result<String, ChromePrepError> {
        tracing::debug!(path = %executable_path.display(), "Querying Chromium version");
        let output = Command::new(executable_path)
            .arg(Self::VERSION_FLAG)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ChromePrepError::VersionProbe {
                path: executable_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ChromePrepError::VersionProbe {
                path: executable_path.to_path_buf(),
                reason: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("chrome");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_reads_stdout_of_version_flag() {
        let temp_dir = tempfile::tempdir().unwrap();
        let exe = write_script(
            temp_dir.path(),
            r#"[ "$1" = "--version" ] && echo "Chromium 90.0.4430.0" || exit 7"#,
        );

        let output = CommandProbe.query_version(&exe).await.unwrap();
        assert_eq!(output.trim(), "Chromium 90.0.4430.0");
    }

    #[tokio::test]
    async fn test_failing_executable_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let exe = write_script(temp_dir.path(), "echo broken >&2; exit 3");

        let err = CommandProbe.query_version(&exe).await.unwrap_err();
        assert!(matches!(err, ChromePrepError::VersionProbe { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = CommandProbe
            .query_version(&temp_dir.path().join("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChromePrepError::VersionProbe { .. }));
    }
}
