mod args;
mod install;
mod params;
mod resolved_command;

pub use args::{Args, Command, SourceOptions, default_log_level, parse_args, parse_args_from};
pub use install::{
    InstallOutcome, SKIP_EXIT_CODE, failure_hint, install_with, run_install, run_resolve, run_skip,
};
pub use params::{InstallParams, ResolveParams, SkipParams};
pub use resolved_command::{ResolvedCommand, resolve_command};
