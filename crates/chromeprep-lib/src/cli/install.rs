use crate::cli::params::{InstallParams, ResolveParams, SkipParams};
use crate::download::{Fetcher, HttpFetcher};
use crate::error::{ChromePrepError, ErrorKind};
use crate::output::{ConfigSink, JsonFileSink, VerifiedArtifactConfig};
use crate::progress::{ProgressSink, TracingProgressSink};
use crate::resolver::{Acquisition, ArtifactResolver};
use crate::revision::{LocalArtifactInfo, Revision};
use crate::skip::{SKIP_DOWNLOAD_VAR, SkipSource};
use crate::store::LocalStore;
use crate::verification::{CommandProbe, VersionProbe};

/// Exit status used when the operator asked to skip the download.
pub const SKIP_EXIT_CODE: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(VerifiedArtifactConfig),
    Skipped(SkipSource),
}

impl InstallOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            InstallOutcome::Installed(_) => 0,
            InstallOutcome::Skipped(_) => SKIP_EXIT_CODE,
        }
    }
}

/// Runs `ensure_local`, `verify` and `persist` in order, stopping at the first failure.
pub async fn install_with<S, F, P, C>(
    resolver: &ArtifactResolver<S, F, P>,
    revision: &Revision,
    min_major_version: u32,
    progress_sink: &mut dyn ProgressSink,
    config_sink: &mut C,
) -> Result<VerifiedArtifactConfig, ChromePrepError>
where
    S: LocalStore,
    F: Fetcher,
    P: VersionProbe,
    C: ConfigSink,
{
    let (info, acquisition) = resolver.ensure_local(revision, progress_sink).await?;
    let config = resolver.verify(&info, min_major_version).await?;
    resolver.persist(&config, config_sink).await?;

    if acquisition == Acquisition::Downloaded {
        tracing::info!(
            "Chromium successfully downloaded to {}",
            info.folder_path.display()
        );
    }
    tracing::info!(
        revision = %revision,
        "Chromium executable is at {}",
        config.executable_path().display()
    );
    Ok(config)
}

pub async fn run_install(params: InstallParams) -> Result<InstallOutcome, ChromePrepError> {
    let InstallParams {
        revision,
        store,
        output_path,
        min_major_version,
        fetch_options,
    } = params;

    let fetcher = HttpFetcher::new(store.clone(), fetch_options)?;
    let resolver = ArtifactResolver::new(store, fetcher, CommandProbe);
    let mut progress_sink = TracingProgressSink::new(revision.clone());
    let mut config_sink = JsonFileSink::new(output_path);

    let config = install_with(
        &resolver,
        &revision,
        min_major_version,
        &mut progress_sink,
        &mut config_sink,
    )
    .await?;
    Ok(InstallOutcome::Installed(config))
}

pub fn run_skip(params: SkipParams) -> InstallOutcome {
    tracing::info!("**INFO** Skipping Chromium download. {}", params.source);
    InstallOutcome::Skipped(params.source)
}

pub fn run_resolve(params: ResolveParams) -> LocalArtifactInfo {
    let ResolveParams { revision, store } = params;
    let info = store.revision_info(&revision);
    if info.present {
        tracing::info!(
            "Chromium r{} found local at {}",
            revision,
            info.executable_path.display()
        );
    } else {
        tracing::info!(url = %info.url, "Chromium r{} not found local", revision);
    }
    info
}

/// Operator-facing advice for a failure, if there is any.
pub fn failure_hint(err: &ChromePrepError) -> Option<String> {
    match err.kind() {
        ErrorKind::Fetch => Some(format!(
            "Set \"{SKIP_DOWNLOAD_VAR}\" env variable to skip download."
        )),
        ErrorKind::VersionTooOld => {
            Some("Pass --revision with a newer Chromium snapshot.".to_string())
        }
        _ => None,
    }
}
