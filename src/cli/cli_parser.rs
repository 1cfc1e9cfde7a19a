use std::{collections::HashMap, path::PathBuf};

use clap::{Parser, ValueEnum};

use crate::errors::CovError;

use super::{
    Configuration, ReportFormat, parse_flag, parse_minimum_coverage, settings::parse_settings,
    split_paths,
};

pub const DEFAULT_MINIMUM_COVERAGE: &str = "80";
pub const DEFAULT_TEST_PATHS: &str = "tests/,test/,**/test_*.py,**/tests.py";
pub const DEFAULT_SOURCE_PATHS: &str = ".";
pub const DEFAULT_EXCLUDE_PATHS: &str =
    "tests/,test/,**/test_*.py,**/tests.py,setup.py,conftest.py";
pub const DEFAULT_FAIL_ON_LOW_COVERAGE: &str = "true";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Run Python tests under coverage and fail CI when coverage is too low",
    long_about = None
)]
pub struct Cli {
    #[arg(
        long,
        help = "Minimum coverage percentage required [default: 80]"
    )]
    minimum_coverage: Option<String>,

    #[arg(
        long,
        help = "Comma-separated test directories, files or glob patterns [default: tests/,test/,**/test_*.py,**/tests.py]"
    )]
    test_paths: Option<String>,

    #[arg(
        long,
        help = "Comma-separated source directories to measure [default: .]"
    )]
    source_paths: Option<String>,

    #[arg(
        long,
        help = "Comma-separated paths omitted from measurement [default: tests/,test/,**/test_*.py,**/tests.py,setup.py,conftest.py]"
    )]
    exclude_paths: Option<String>,

    #[arg(
        long,
        help = "Exit with failure when coverage is below the minimum [default: true]"
    )]
    fail_on_low_coverage: Option<String>,

    #[arg(long, value_enum, help = "Coverage report format [default: term]")]
    report_format: Option<ReportFormat>,

    #[arg(long, help = "Repository root, defaults to the current directory")]
    workspace: Option<PathBuf>,

    #[arg(long, env = "GITHUB_OUTPUT", help = "File receiving key=value step outputs")]
    github_output: Option<PathBuf>,

    #[arg(long, help = "Settings file with key=value defaults")]
    config: Option<PathBuf>,

    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Check that python, coverage and pytest are installed"
    )]
    check_dependencies: bool,
}

pub enum Action {
    Check(Configuration),
    CheckDependencies,
}

fn resolve(
    cli_value: Option<String>,
    settings: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> String {
    cli_value
        .or_else(|| settings.get(key).cloned())
        .unwrap_or_else(|| default.to_string())
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn into_action(self) -> Result<Action, CovError> {
        if self.check_dependencies {
            return Ok(Action::CheckDependencies);
        }
        self.into_configuration().map(Action::Check)
    }

    pub fn into_configuration(self) -> Result<Configuration, CovError> {
        let settings = match self.config.as_ref() {
            Some(path) => parse_settings(path)?,
            None => HashMap::new(),
        };

        let minimum_coverage = parse_minimum_coverage(&resolve(
            self.minimum_coverage,
            &settings,
            "minimum-coverage",
            DEFAULT_MINIMUM_COVERAGE,
        ))?;

        let report_format = match (self.report_format, settings.get("report-format")) {
            (Some(format), _) => format,
            (None, Some(value)) => ReportFormat::from_str(value, true).map_err(|_| {
                CovError::InvalidArgument(format!(
                    "Invalid report format `{}`. Supported are: term, html, xml, json",
                    value
                ))
            })?,
            (None, None) => ReportFormat::Term,
        };

        let workspace = match self.workspace {
            Some(path) => std::path::absolute(path)?,
            None => std::env::current_dir()?,
        };

        Ok(Configuration {
            minimum_coverage,
            test_paths: split_paths(&resolve(
                self.test_paths,
                &settings,
                "test-paths",
                DEFAULT_TEST_PATHS,
            )),
            source_paths: split_paths(&resolve(
                self.source_paths,
                &settings,
                "source-paths",
                DEFAULT_SOURCE_PATHS,
            )),
            exclude_paths: split_paths(&resolve(
                self.exclude_paths,
                &settings,
                "exclude-paths",
                DEFAULT_EXCLUDE_PATHS,
            )),
            fail_on_low_coverage: parse_flag(&resolve(
                self.fail_on_low_coverage,
                &settings,
                "fail-on-low-coverage",
                DEFAULT_FAIL_ON_LOW_COVERAGE,
            )),
            report_format,
            workspace,
            github_output: self.github_output,
        })
    }
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
