use chromeprep_lib::cli::{
    ResolvedCommand, failure_hint, parse_args, resolve_command, run_install, run_resolve,
    run_skip,
};
use chromeprep_lib::env::ProcessEnv;
use chromeprep_lib::error::ChromePrepError;
use std::process::ExitCode;

/// Exit status of `resolve` when the revision is not installed.
const NOT_INSTALLED_EXIT_CODE: u8 = 1;

async fn run() -> Result<u8, ChromePrepError> {
    let env = ProcessEnv;
    let args = parse_args(&env);
    let command = resolve_command(args.command, &env)?;

    let exit_code = match command {
        ResolvedCommand::Install(params) => run_install(params).await?.exit_code(),
        ResolvedCommand::Skip(params) => run_skip(params).exit_code(),
        ResolvedCommand::Resolve(params) => {
            let info = run_resolve(params);
            println!("{}", info.executable_path.display());
            if info.present { 0 } else { NOT_INSTALLED_EXIT_CODE }
        }
    };

    Ok(exit_code)
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    match run().await {
        Ok(exit_code) => Ok(ExitCode::from(exit_code)),
        Err(err) => {
            tracing::error!("ERROR: {}", err);
            if let Some(hint) = failure_hint(&err) {
                tracing::error!("{}", hint);
            }
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}
