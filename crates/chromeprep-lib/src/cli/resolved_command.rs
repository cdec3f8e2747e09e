use crate::cli::args::{Command, SourceOptions};
use crate::cli::params::{InstallParams, ResolveParams, SkipParams};
use crate::config::{Config, load_config};
use crate::download::FetchOptions;
use crate::env::EnvLookup;
use crate::error::ChromePrepError;
use crate::revision::{Platform, Revision};
use crate::skip::skip_requested;
use crate::store::FsStore;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Install(InstallParams),
    Skip(SkipParams),
    Resolve(ResolveParams),
}

fn parse_download_host(host: &str) -> Result<Url, ChromePrepError> {
    let url = Url::parse(host).map_err(|e| ChromePrepError::InvalidDownloadHost {
        host: host.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ChromePrepError::InvalidDownloadHost {
            host: host.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}

fn resolve_source(
    source: SourceOptions,
    env: &impl EnvLookup,
) -> Result<(Config, Revision, FsStore), ChromePrepError> {
    let SourceOptions {
        config_path,
        revision,
        download_host,
        install_dir,
        platform,
    } = source;

    let app_config = load_config(config_path.as_deref(), env)?;

    let revision = match revision {
        Some(revision) => Revision::new(revision)?,
        None => app_config.revision.clone().unwrap_or_default(),
    };

    let download_host =
        parse_download_host(download_host.as_deref().unwrap_or(app_config.download_host.as_str()))?;

    let platform = platform
        .or(app_config.platform)
        .or_else(Platform::current)
        .ok_or_else(|| ChromePrepError::CliArgumentValidation {
            details: format!(
                "Chromium snapshots are not available for {}-{}. Pass --platform or configure platform.",
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
        })?;

    // Recorded executable paths must not depend on the working directory.
    let install_dir = std::path::absolute(
        install_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| app_config.install_dir.clone()),
    )?;

    let store = FsStore::new(install_dir, platform, download_host);
    Ok((app_config, revision, store))
}

pub fn resolve_command(
    command: Command,
    env: &impl EnvLookup,
) -> Result<ResolvedCommand, ChromePrepError> {
    match command {
        Command::Install {
            source,
            output_path,
            min_major_version,
            skip_download,
            keep_archive,
        } => {
            // Skipping must not depend on anything else being valid.
            if let Some(source) = skip_requested(skip_download, env) {
                return Ok(ResolvedCommand::Skip(SkipParams { source }));
            }

            let (app_config, revision, store) = resolve_source(source, env)?;

            let min_major_version = min_major_version.unwrap_or(app_config.min_major_version);
            if min_major_version == 0 {
                return Err(ChromePrepError::CliArgumentValidation {
                    details: "min-version must be greater than 0.".to_string(),
                });
            }

            let output_path = output_path
                .map(PathBuf::from)
                .unwrap_or(app_config.output.path);

            Ok(ResolvedCommand::Install(InstallParams {
                revision,
                store,
                output_path,
                min_major_version,
                fetch_options: FetchOptions { keep_archive },
            }))
        }
        Command::Resolve { source } => {
            let (_, revision, store) = resolve_source(source, env)?;
            Ok(ResolvedCommand::Resolve(ResolveParams { revision, store }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REVISION_VAR;
    use crate::env::MapEnv;
    use crate::revision::DEFAULT_REVISION;
    use crate::skip::{SKIP_DOWNLOAD_VAR, SkipSource};
    use crate::store::LocalStore;

    fn install(source: SourceOptions) -> Command {
        Command::Install {
            source,
            output_path: None,
            min_major_version: None,
            skip_download: false,
            keep_archive: false,
        }
    }

    fn linux_source() -> SourceOptions {
        SourceOptions {
            platform: Some(Platform::Linux),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let ResolvedCommand::Install(params) =
            resolve_command(install(linux_source()), &MapEnv::new()).unwrap()
        else {
            panic!("expected install");
        };

        assert_eq!(params.revision.as_str(), DEFAULT_REVISION);
        assert_eq!(params.min_major_version, 75);
        assert_eq!(params.output_path, PathBuf::from("chrome.json"));
        assert_eq!(
            params.store.install_dir(),
            std::env::current_dir().unwrap().join("temp").join("chrome")
        );
        assert_eq!(
            params.store.download_host().as_str(),
            "https://storage.googleapis.com/"
        );
    }

    #[test]
    fn test_relative_install_dir_becomes_absolute() {
        let source = SourceOptions {
            install_dir: Some("cache/chromium".to_string()),
            ..linux_source()
        };
        let ResolvedCommand::Install(params) =
            resolve_command(install(source), &MapEnv::new()).unwrap()
        else {
            panic!("expected install");
        };

        let install_dir = params.store.install_dir();
        assert!(install_dir.is_absolute());
        assert!(install_dir.ends_with("cache/chromium"));

        let info = params.store.revision_info(&params.revision);
        assert!(info.executable_path.is_absolute());
        assert!(info.executable_path.starts_with(install_dir));
    }

    #[test]
    fn test_absolute_install_dir_is_kept() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = SourceOptions {
            install_dir: Some(temp_dir.path().display().to_string()),
            ..linux_source()
        };
        let ResolvedCommand::Resolve(params) =
            resolve_command(Command::Resolve { source }, &MapEnv::new()).unwrap()
        else {
            panic!("expected resolve");
        };
        assert_eq!(params.store.install_dir(), temp_dir.path());
    }

    #[test]
    fn test_skip_wins_even_with_broken_config() {
        let env = MapEnv::new().with(SKIP_DOWNLOAD_VAR, "1");
        let source = SourceOptions {
            config_path: Some("/definitely/missing/chromeprep.toml".to_string()),
            ..linux_source()
        };

        let ResolvedCommand::Skip(params) = resolve_command(install(source), &env).unwrap() else {
            panic!("expected skip");
        };
        assert_eq!(params.source, SkipSource::Environment);
    }

    #[test]
    fn test_command_line_revision_beats_environment() {
        let env = MapEnv::new().with(REVISION_VAR, "111111");
        let source = SourceOptions {
            revision: Some("222222".to_string()),
            ..linux_source()
        };
        let ResolvedCommand::Install(params) = resolve_command(install(source), &env).unwrap()
        else {
            panic!("expected install");
        };
        assert_eq!(params.revision.as_str(), "222222");

        let ResolvedCommand::Install(params) =
            resolve_command(install(linux_source()), &env).unwrap()
        else {
            panic!("expected install");
        };
        assert_eq!(params.revision.as_str(), "111111");
    }

    #[test]
    fn test_invalid_download_host_is_rejected() {
        for host in ["not a url", "ftp://example.com"] {
            let source = SourceOptions {
                download_host: Some(host.to_string()),
                ..linux_source()
            };
            let err = resolve_command(install(source), &MapEnv::new()).unwrap_err();
            assert!(matches!(err, ChromePrepError::InvalidDownloadHost { .. }), "{host}");
        }
    }

    #[test]
    fn test_zero_min_version_is_rejected() {
        let command = Command::Install {
            source: linux_source(),
            output_path: None,
            min_major_version: Some(0),
            skip_download: false,
            keep_archive: false,
        };
        assert!(matches!(
            resolve_command(command, &MapEnv::new()),
            Err(ChromePrepError::CliArgumentValidation { .. })
        ));
    }

    #[test]
    fn test_resolve_ignores_skip_flags() {
        let env = MapEnv::new().with(SKIP_DOWNLOAD_VAR, "1");
        let resolved = resolve_command(
            Command::Resolve {
                source: linux_source(),
            },
            &env,
        )
        .unwrap();
        assert!(matches!(resolved, ResolvedCommand::Resolve(_)));
    }
}
