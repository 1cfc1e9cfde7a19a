use std::{
    fs,
    path::{Path, PathBuf},
};

use colored::Colorize;

use crate::{
    cli::{Configuration, ReportFormat},
    discovery::TestFileSet,
    errors::CovError,
    runtime::{CoverageReport, ExecutionResult, python::coverage_report::CoverageJson},
    utils::process::{CommandExecutor, display_command},
};

pub const SUMMARY_FILE: &str = "coverage.json";
pub const HTML_DIRECTORY: &str = "htmlcov";
pub const XML_FILE: &str = "coverage.xml";
pub const DETAILED_REPORT_FALLBACK: &str = "Could not generate detailed report";

fn args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

/// `coverage run` invocation for the discovered tests. Falls back to
/// `unittest discover` when nothing was found.
pub fn build_coverage_command(config: &Configuration, test_files: &TestFileSet) -> Vec<String> {
    let mut command = args(&["coverage", "run"]);
    command.extend(
        config
            .source_paths
            .iter()
            .map(|source| format!("--source={}", source)),
    );
    for exclude in config.exclude_paths.iter() {
        command.push("--omit".to_string());
        command.push(exclude.clone());
    }
    if test_files.is_empty() {
        command.extend(args(&["-m", "unittest", "discover"]));
    } else {
        command.extend(args(&["-m", "pytest"]));
        command.extend(test_files.command_arguments());
    }
    command
}

pub fn detailed_report_command(format: ReportFormat) -> Vec<String> {
    match format {
        ReportFormat::Html => args(&["coverage", "html", "-d", HTML_DIRECTORY]),
        ReportFormat::Xml => args(&["coverage", "xml", "-o", XML_FILE]),
        ReportFormat::Term | ReportFormat::Json => args(&["coverage", "report"]),
    }
}

pub struct CoverageRuntime<E: CommandExecutor> {
    executor: E,
    workspace: PathBuf,
}

impl<E: CommandExecutor> CoverageRuntime<E> {
    pub fn new(executor: E, workspace: &Path) -> Self {
        Self {
            executor,
            workspace: workspace.to_path_buf(),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs the tests under coverage. Failing tests still count as a
    /// successful run so that coverage gets reported; only a run that could
    /// not start is unsuccessful.
    pub fn run_tests(&self, config: &Configuration, test_files: &TestFileSet) -> ExecutionResult {
        println!("\n{}", "Running tests with coverage...".bold());
        let command = build_coverage_command(config, test_files);
        println!("Command: {}", display_command(&command));

        match self.executor.execute(&command, &self.workspace) {
            Ok(output) => {
                println!("Test output:");
                println!("{}", output.stdout);
                if !output.stderr.is_empty() {
                    println!("Errors:");
                    println!("{}", output.stderr);
                }
                if !output.success() {
                    tracing::warn!(
                        exit_code = ?output.status,
                        "Tests exited with a failure status, measuring coverage anyway"
                    );
                }
                ExecutionResult {
                    success: true,
                    output: output.combined(),
                    return_code: output.status,
                }
            }
            Err(CovError::ToolNotFound(tool)) => {
                tracing::error!("Coverage tool not found ({}). Make sure 'coverage' is installed.", tool);
                ExecutionResult::not_started("Coverage tool not found")
            }
            Err(e) => {
                tracing::error!("Error running tests: {}", e);
                ExecutionResult::not_started(&format!("Error running tests: {}", e))
            }
        }
    }

    fn read_summary(&self) -> Result<CoverageJson, CovError> {
        let command = args(&["coverage", "json", "-o", SUMMARY_FILE]);
        tracing::debug!("Running {}", display_command(&command));
        let output = self.executor.execute(&command, &self.workspace)?;
        if !output.success() {
            return Err(CovError::RuntimeError(format!(
                "`{}` exited with status {:?}: {}",
                display_command(&command),
                output.status,
                output.stderr.trim()
            )));
        }

        let summary_path = self.workspace.join(SUMMARY_FILE);
        if !summary_path.exists() {
            return Err(CovError::RuntimeError(
                "Coverage JSON file not found".to_string(),
            ));
        }
        let summary: CoverageJson = serde_json::from_str(&fs::read_to_string(summary_path)?)?;
        let percentage = summary.totals.percent_covered;
        if !percentage.is_finite() || percentage < 0.0 {
            return Err(CovError::RuntimeError(format!(
                "Invalid coverage percentage: {}",
                percentage
            )));
        }
        Ok(summary)
    }

    fn detailed_report(&self, format: ReportFormat) -> String {
        let command = detailed_report_command(format);
        tracing::debug!("Running {}", display_command(&command));
        match self.executor.execute(&command, &self.workspace) {
            Ok(output) if output.success() => output.stdout,
            // `coverage report` exits 2 under `fail_under` but still prints the table.
            Ok(output) if !output.stdout.trim().is_empty() => {
                tracing::warn!(exit_code = ?output.status, "Detailed coverage report exited with failure");
                output.stdout
            }
            Ok(output) => {
                tracing::warn!(
                    exit_code = ?output.status,
                    "Detailed coverage report failed: {}",
                    output.stderr.trim()
                );
                DETAILED_REPORT_FALLBACK.to_string()
            }
            Err(e) => {
                tracing::warn!("Detailed coverage report failed: {}", e);
                DETAILED_REPORT_FALLBACK.to_string()
            }
        }
    }

    /// Never fails: any problem with the summary yields an empty 0% report.
    pub fn generate_report(&self, format: ReportFormat) -> CoverageReport {
        println!("\n{}", "Generating coverage report...".bold());
        let summary = match self.read_summary() {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Could not read coverage summary: {}", e);
                return CoverageReport::empty();
            }
        };

        CoverageReport {
            percentage: summary.totals.percent_covered,
            body: self.detailed_report(format),
            covered_lines: summary.totals.covered_lines,
            num_statements: summary.totals.num_statements,
        }
    }
}
