use std::process::ExitCode;

use covgate::{
    cli::{
        cli_parser::{Action, parse_cli},
        dependency_check::check_dependencies,
    },
    errors::CovError,
    runner::checker::CoverageChecker,
    utils::process::SystemExecutor,
};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();
}

fn main() -> Result<ExitCode, CovError> {
    let cli = parse_cli();
    init_logging(cli.verbose());

    match cli.into_action()? {
        Action::CheckDependencies => Ok(if check_dependencies(&SystemExecutor, &std::env::current_dir()?) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }),
        Action::Check(config) => {
            let checker = CoverageChecker::new(config, SystemExecutor);
            Ok(ExitCode::from(checker.run()))
        }
    }
}
