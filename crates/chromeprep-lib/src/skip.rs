use crate::env::EnvLookup;
use std::fmt;

/// Name of the variable operators set to bypass the download.
pub const SKIP_DOWNLOAD_VAR: &str = "PUPPETEER_SKIP_CHROMIUM_DOWNLOAD";

/// Where a request to skip the download came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipSource {
    CommandLine,
    Environment,
    NpmConfig,
    ProjectConfig,
}

impl SkipSource {
    /// Environment-backed sources in decreasing precedence.
    pub const ENV_ORDER: [(SkipSource, &'static str); 3] = [
        (SkipSource::Environment, SKIP_DOWNLOAD_VAR),
        (
            SkipSource::NpmConfig,
            "NPM_CONFIG_PUPPETEER_SKIP_CHROMIUM_DOWNLOAD",
        ),
        (
            SkipSource::ProjectConfig,
            "NPM_PACKAGE_CONFIG_PUPPETEER_SKIP_CHROMIUM_DOWNLOAD",
        ),
    ];
}

impl fmt::Display for SkipSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipSource::CommandLine => write!(f, "--skip-download was passed on the command line"),
            SkipSource::Environment => {
                write!(f, "\"{SKIP_DOWNLOAD_VAR}\" environment variable was found")
            }
            SkipSource::NpmConfig => write!(f, "\"{SKIP_DOWNLOAD_VAR}\" was set in npm config"),
            SkipSource::ProjectConfig => {
                write!(f, "\"{SKIP_DOWNLOAD_VAR}\" was set in project config")
            }
        }
    }
}

/// Returns the first source asking to skip the download, if any.
pub fn skip_requested(cli_flag: bool, env: &impl EnvLookup) -> Option<SkipSource> {
    if cli_flag {
        return Some(SkipSource::CommandLine);
    }
    SkipSource::ENV_ORDER
        .iter()
        .find(|(_, name)| env.non_empty(name).is_some())
        .map(|(source, _)| *source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    #[test]
    fn test_no_flags_set() {
        assert_eq!(skip_requested(false, &MapEnv::new()), None);
    }

    #[test]
    fn test_each_flag_alone_is_detected() {
        for (source, name) in SkipSource::ENV_ORDER {
            let env = MapEnv::new().with(name, "1");
            assert_eq!(skip_requested(false, &env), Some(source), "{name}");
        }
    }

    #[test]
    fn test_precedence_follows_declared_order() {
        let env = MapEnv::new()
            .with("NPM_CONFIG_PUPPETEER_SKIP_CHROMIUM_DOWNLOAD", "true")
            .with("NPM_PACKAGE_CONFIG_PUPPETEER_SKIP_CHROMIUM_DOWNLOAD", "true");
        assert_eq!(skip_requested(false, &env), Some(SkipSource::NpmConfig));

        let env = env.with(SKIP_DOWNLOAD_VAR, "true");
        assert_eq!(skip_requested(false, &env), Some(SkipSource::Environment));
        assert_eq!(skip_requested(true, &env), Some(SkipSource::CommandLine));
    }

    #[test]
    fn test_empty_value_does_not_count() {
        let env = MapEnv::new().with(SKIP_DOWNLOAD_VAR, "");
        assert_eq!(skip_requested(false, &env), None);
    }

    #[test]
    fn test_message_names_the_variable() {
        assert!(SkipSource::ProjectConfig
            .to_string()
            .contains(SKIP_DOWNLOAD_VAR));
    }
}
