use crate::env::EnvLookup;
use crate::revision::Platform;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use tracing::Level;

/// npm log levels that hide informational output.
const QUIET_NPM_LOG_LEVELS: [&str; 3] = ["silent", "error", "warn"];
const NPM_LOG_LEVEL_VAR: &str = "npm_config_loglevel";

#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub config_path: Option<String>,
    pub revision: Option<String>,
    pub download_host: Option<String>,
    pub install_dir: Option<String>,
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone)]
pub enum Command {
    Install {
        source: SourceOptions,
        output_path: Option<String>,
        min_major_version: Option<u32>,
        skip_download: bool,
        keep_archive: bool,
    },
    Resolve {
        source: SourceOptions,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "chromeprep",
    version,
    author = "Nick Guletskii",
    about = "Download a Chromium snapshot, check its version and record its location in chrome.json",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: Option<CliCommand>,

    #[command(flatten)]
    install: InstallArgs,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Locate or download Chromium, verify it and write chrome.json (default)
    Install(InstallArgs),

    /// Print where the configured revision lives without downloading it
    Resolve(SourceArgs),
}

#[derive(Debug, Clone, ClapArgs)]
struct SourceArgs {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Sets a custom config file (default: chromeprep.{toml,yaml,json} if present)"
    )]
    config: Option<String>,

    #[arg(
        short = 'r',
        long = "revision",
        value_name = "REV",
        help = "Overrides the Chromium revision (env: PUPPETEER_CHROMIUM_REVISION)"
    )]
    revision: Option<String>,

    #[arg(
        long = "download-host",
        value_name = "URL",
        help = "Overrides the download host (env: PUPPETEER_DOWNLOAD_HOST)"
    )]
    download_host: Option<String>,

    #[arg(
        long = "install-dir",
        value_name = "DIR",
        help = "Directory revisions are extracted into (default: temp/chrome)"
    )]
    install_dir: Option<String>,

    #[arg(
        long = "platform",
        value_name = "PLATFORM",
        help = "Overrides the detected platform"
    )]
    platform: Option<Platform>,
}

#[derive(Debug, Clone, ClapArgs)]
struct InstallArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Sets the output configuration path (default: chrome.json)"
    )]
    output: Option<String>,

    #[arg(
        long = "min-version",
        value_name = "MAJOR",
        help = "Minimum accepted Chromium major version (default: 75)"
    )]
    min_version: Option<u32>,

    #[arg(
        long = "skip-download",
        help = "Do nothing and exit, same as setting PUPPETEER_SKIP_CHROMIUM_DOWNLOAD"
    )]
    skip_download: bool,

    #[arg(long = "keep-archive", help = "Keep the downloaded zip archive")]
    keep_archive: bool,
}

impl From<SourceArgs> for SourceOptions {
    fn from(args: SourceArgs) -> Self {
        Self {
            config_path: args.config,
            revision: args.revision,
            download_host: args.download_host,
            install_dir: args.install_dir,
            platform: args.platform,
        }
    }
}

impl From<InstallArgs> for Command {
    fn from(args: InstallArgs) -> Self {
        Command::Install {
            source: args.source.into(),
            output_path: args.output,
            min_major_version: args.min_version,
            skip_download: args.skip_download,
            keep_archive: args.keep_archive,
        }
    }
}

/// Default log level, honouring the quiet npm log levels.
pub fn default_log_level(verbose: u8, env: &impl EnvLookup) -> Level {
    match verbose {
        0 => {
            let quiet = env
                .non_empty(NPM_LOG_LEVEL_VAR)
                .is_some_and(|level| QUIET_NPM_LOG_LEVELS.contains(&level.as_str()));
            if quiet { Level::WARN } else { Level::INFO }
        }
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Parses `args` without touching the global tracing subscriber.
pub fn parse_args_from<I, T>(args: I, env: &impl EnvLookup) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let log_level = default_log_level(cli.verbose, env);

    let command = match cli.command {
        Some(CliCommand::Install(install)) => install.into(),
        Some(CliCommand::Resolve(source)) => Command::Resolve {
            source: source.into(),
        },
        None => cli.install.into(),
    };

    Ok(Args { command, log_level })
}

pub fn parse_args(env: &impl EnvLookup) -> Args {
    let args = parse_args_from(std::env::args_os(), env).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(args.log_level.into())
                .from_env_lossy()
                .add_directive("opendal=warn".parse().unwrap()),
        )
        .init();

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    fn parse(args: &[&str]) -> Args {
        parse_args_from(args.iter().copied(), &MapEnv::new()).unwrap()
    }

    #[test]
    fn test_no_arguments_means_install_with_defaults() {
        let args = parse(&["chromeprep"]);
        match args.command {
            Command::Install {
                source,
                output_path,
                min_major_version,
                skip_download,
                keep_archive,
            } => {
                assert!(source.revision.is_none());
                assert!(output_path.is_none());
                assert!(min_major_version.is_none());
                assert!(!skip_download);
                assert!(!keep_archive);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(args.log_level, Level::INFO);
    }

    #[test]
    fn test_top_level_install_flags() {
        let args = parse(&[
            "chromeprep",
            "--revision",
            "818858",
            "--platform",
            "mac",
            "--min-version",
            "80",
            "-o",
            "out.json",
            "--skip-download",
        ]);
        let Command::Install {
            source,
            output_path,
            min_major_version,
            skip_download,
            ..
        } = args.command
        else {
            panic!("expected install");
        };
        assert_eq!(source.revision.as_deref(), Some("818858"));
        assert_eq!(source.platform, Some(Platform::Mac));
        assert_eq!(min_major_version, Some(80));
        assert_eq!(output_path.as_deref(), Some("out.json"));
        assert!(skip_download);
    }

    #[test]
    fn test_resolve_subcommand() {
        let args = parse(&["chromeprep", "resolve", "-vv", "--install-dir", "/opt/chrome"]);
        let Command::Resolve { source } = args.command else {
            panic!("expected resolve");
        };
        assert_eq!(source.install_dir.as_deref(), Some("/opt/chrome"));
        assert_eq!(args.log_level, Level::TRACE);
    }

    #[test]
    fn test_quiet_npm_log_level_hides_info() {
        for level in QUIET_NPM_LOG_LEVELS {
            let env = MapEnv::new().with(NPM_LOG_LEVEL_VAR, level);
            assert_eq!(default_log_level(0, &env), Level::WARN);
        }
        let env = MapEnv::new().with(NPM_LOG_LEVEL_VAR, "notice");
        assert_eq!(default_log_level(0, &env), Level::INFO);
        let env = MapEnv::new().with(NPM_LOG_LEVEL_VAR, "silent");
        assert_eq!(default_log_level(1, &env), Level::DEBUG);
    }
}
