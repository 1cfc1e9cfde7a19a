use colored::Colorize;
use tabled::{Table, Tabled, settings::Style};

use crate::{
    cli::Configuration,
    discovery::{TestFileSet, find_test_files},
    runner::{EXIT_FAILURE, EXIT_SUCCESS, outputs::GithubOutput},
    runtime::{CoverageReport, python::coverage::CoverageRuntime},
    utils::process::CommandExecutor,
};

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Discover, run, report, publish and decide, in that order.
pub struct CoverageChecker<E: CommandExecutor> {
    config: Configuration,
    runtime: CoverageRuntime<E>,
    outputs: GithubOutput,
}

impl<E: CommandExecutor> CoverageChecker<E> {
    pub fn new(config: Configuration, executor: E) -> Self {
        let runtime = CoverageRuntime::new(executor, &config.workspace);
        let outputs = GithubOutput::new(config.github_output.as_deref(), config.report_format);
        Self {
            config,
            runtime,
            outputs,
        }
    }

    pub fn runtime(&self) -> &CoverageRuntime<E> {
        &self.runtime
    }

    fn print_banner(&self) {
        println!("{}", "Starting Test Coverage Check".bold());
        println!(
            "   Minimum coverage required: {}%",
            self.config.minimum_coverage
        );
        println!("   Test paths: {}", self.config.test_paths.join(", "));
        println!("   Source paths: {}", self.config.source_paths.join(", "));
        println!("   Exclude paths: {}", self.config.exclude_paths.join(", "));
        println!("   Report format: {}", self.config.report_format.name());
    }

    fn discover(&self) -> TestFileSet {
        println!("\n{}", "Discovering test files...".bold());
        let test_files = find_test_files(&self.config.workspace, &self.config.test_paths)
            .unwrap_or_else(|e| {
                tracing::error!("Test discovery failed: {}", e);
                TestFileSet::default()
            });
        println!("Found {} test files:", test_files.len());
        for test_file in test_files.relative_to(&self.config.workspace) {
            println!("   • {}", test_file);
        }
        test_files
    }

    fn print_results(&self, report: &CoverageReport, tests_found: usize) {
        let mut rows = vec![
            ResultRow {
                metric: "Total Coverage",
                value: format!("{:.2}%", report.percentage),
            },
            ResultRow {
                metric: "Required Coverage",
                value: format!("{}%", self.config.minimum_coverage),
            },
            ResultRow {
                metric: "Tests Found",
                value: tests_found.to_string(),
            },
        ];
        if let (Some(covered), Some(statements)) = (report.covered_lines, report.num_statements) {
            rows.push(ResultRow {
                metric: "Covered Lines",
                value: format!("{}/{}", covered, statements),
            });
        }

        println!("\n{}", "Coverage Results".bold());
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
        println!("\n{}", report.body);
    }

    /// Exit code for a measured percentage. Meeting the threshold exactly passes.
    pub fn decide(&self, percentage: f64) -> u8 {
        if percentage < self.config.minimum_coverage {
            println!(
                "{}",
                format!(
                    "Coverage {:.2}% is below required {}%",
                    percentage, self.config.minimum_coverage
                )
                .red()
                .bold()
            );
            if self.config.fail_on_low_coverage {
                return EXIT_FAILURE;
            }
            tracing::warn!("Continuing despite low coverage (fail_on_low_coverage=false)");
        } else {
            println!(
                "{}",
                format!(
                    "Coverage {:.2}% meets requirement of {}%",
                    percentage, self.config.minimum_coverage
                )
                .green()
                .bold()
            );
        }
        EXIT_SUCCESS
    }

    pub fn run(&self) -> u8 {
        self.print_banner();

        let test_files = self.discover();
        if test_files.is_empty() {
            tracing::warn!("No test files found!");
            self.outputs.write(0.0, 0);
            return if self.config.fail_on_low_coverage {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            };
        }

        let execution = self.runtime.run_tests(&self.config, &test_files);
        if !execution.success {
            println!("{}", "Failed to run tests".red().bold());
            self.outputs.write(0.0, test_files.len());
            return EXIT_FAILURE;
        }

        let report = self.runtime.generate_report(self.config.report_format);
        self.print_results(&report, test_files.len());
        self.outputs.write(report.percentage, test_files.len());

        self.decide(report.percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{fs, path::Path};

    use crate::{
        cli::ReportFormat,
        errors::CovError,
        utils::test_utils::{ScriptedExecutor, python_project},
    };

    fn config(workspace: &Path, minimum_coverage: f64, fail_on_low_coverage: bool) -> Configuration {
        Configuration {
            minimum_coverage,
            test_paths: vec!["tests/".to_string()],
            source_paths: vec![".".to_string()],
            exclude_paths: vec!["tests/".to_string()],
            fail_on_low_coverage,
            report_format: ReportFormat::Term,
            workspace: workspace.to_path_buf(),
            github_output: Some(workspace.join("github_output")),
        }
    }

    fn outputs(workspace: &Path) -> String {
        fs::read_to_string(workspace.join("github_output")).unwrap()
    }

    #[test]
    fn no_tests_fails_when_requested() {
        let project = python_project(&["tests/helper.py"]);
        let checker = CoverageChecker::new(
            config(project.path(), 80.0, true),
            ScriptedExecutor::coverage("{}", 0),
        );

        assert_eq!(checker.run(), EXIT_FAILURE);
        assert_eq!(
            outputs(project.path()),
            "coverage_percentage=0.00\ntests_found=0\ncoverage_report=terminal_output\n"
        );
        assert!(checker.runtime().executor().recorded().is_empty());
    }

    #[test]
    fn no_tests_passes_when_not_failing_on_low_coverage() {
        let project = python_project(&[]);
        let checker = CoverageChecker::new(
            config(project.path(), 80.0, false),
            ScriptedExecutor::coverage("{}", 0),
        );
        assert_eq!(checker.run(), EXIT_SUCCESS);
        assert!(outputs(project.path()).starts_with("coverage_percentage=0.00\ntests_found=0\n"));
    }

    #[test]
    fn coverage_above_threshold() {
        let project = python_project(&["tests/test_example.py"]);
        let checker = CoverageChecker::new(
            config(project.path(), 80.0, true),
            ScriptedExecutor::coverage(r#"{"totals": {"percent_covered": 85.0}}"#, 0),
        );

        assert_eq!(checker.run(), EXIT_SUCCESS);
        assert_eq!(
            outputs(project.path()),
            "coverage_percentage=85.00\ntests_found=1\ncoverage_report=terminal_output\n"
        );
        let calls = checker.runtime().executor().recorded();
        assert_eq!(calls.len(), 3);
        assert_eq!(&calls[0][..2], &["coverage".to_string(), "run".to_string()]);
        assert!(calls[0].last().unwrap().ends_with("tests/test_example.py"));
    }

    #[test]
    fn coverage_equal_to_threshold_passes_either_way() {
        for fail_on_low_coverage in [true, false] {
            let project = python_project(&["tests/test_example.py"]);
            let checker = CoverageChecker::new(
                config(project.path(), 80.0, fail_on_low_coverage),
                ScriptedExecutor::coverage(r#"{"totals": {"percent_covered": 80.0}}"#, 0),
            );
            assert_eq!(checker.run(), EXIT_SUCCESS);
        }
    }

    #[test]
    fn low_coverage_fails() {
        let project = python_project(&["tests/test_example.py"]);
        let checker = CoverageChecker::new(
            config(project.path(), 80.0, true),
            ScriptedExecutor::coverage(r#"{"totals": {"percent_covered": 60.0}}"#, 0),
        );
        assert_eq!(checker.run(), EXIT_FAILURE);
        assert!(outputs(project.path()).starts_with("coverage_percentage=60.00\n"));
    }

    #[test]
    fn low_coverage_continues_when_allowed() {
        let project = python_project(&["tests/test_example.py"]);
        let checker = CoverageChecker::new(
            config(project.path(), 80.0, false),
            ScriptedExecutor::coverage(r#"{"totals": {"percent_covered": 79.99}}"#, 0),
        );
        assert_eq!(checker.run(), EXIT_SUCCESS);
    }

    #[test]
    fn failing_tests_are_still_measured() {
        let project = python_project(&["tests/test_example.py"]);
        let checker = CoverageChecker::new(
            config(project.path(), 50.0, true),
            ScriptedExecutor::new(|command, cwd| {
                if command[1] == "run" {
                    return crate::utils::test_utils::exited(1, "1 failed\n");
                }
                if command[1] == "json" {
                    fs::write(
                        cwd.join("coverage.json"),
                        r#"{"totals": {"percent_covered": 55.0}}"#,
                    )?;
                }
                crate::utils::test_utils::exited(0, "")
            }),
        );
        assert_eq!(checker.run(), EXIT_SUCCESS);
        assert!(outputs(project.path()).starts_with("coverage_percentage=55.00\n"));
    }

    #[test]
    fn tool_missing_fails_regardless_of_flag() {
        let project = python_project(&["tests/test_example.py"]);
        let checker = CoverageChecker::new(
            config(project.path(), 0.0, false),
            ScriptedExecutor::new(|command, _| Err(CovError::ToolNotFound(command[0].clone()))),
        );
        assert_eq!(checker.run(), EXIT_FAILURE);
        assert_eq!(
            outputs(project.path()),
            "coverage_percentage=0.00\ntests_found=1\ncoverage_report=terminal_output\n"
        );
        assert_eq!(checker.runtime().executor().recorded().len(), 1);
    }

    #[test]
    fn unreadable_summary_counts_as_zero() {
        let project = python_project(&["tests/test_example.py"]);
        let checker = CoverageChecker::new(
            config(project.path(), 0.0, true),
            ScriptedExecutor::coverage(r#"{"summary": "no totals key"}"#, 0),
        );
        assert_eq!(checker.run(), EXIT_SUCCESS);
        assert!(outputs(project.path()).starts_with("coverage_percentage=0.00\n"));
    }

    #[test]
    fn html_location_published_even_when_generation_fails() {
        let project = python_project(&["tests/test_example.py"]);
        let mut html_config = config(project.path(), 80.0, true);
        html_config.report_format = ReportFormat::Html;
        let checker = CoverageChecker::new(
            html_config,
            ScriptedExecutor::coverage(r#"{"totals": {"percent_covered": 90.0}}"#, 2),
        );
        assert_eq!(checker.run(), EXIT_SUCCESS);
        assert!(
            outputs(project.path()).ends_with("coverage_report=htmlcov/index.html\n")
        );
    }

    #[test]
    fn negative_threshold_always_passes() {
        let project = python_project(&["tests/test_example.py"]);
        let checker = CoverageChecker::new(
            config(project.path(), -10.0, true),
            ScriptedExecutor::coverage("invalid json", 0),
        );
        assert_eq!(checker.run(), EXIT_SUCCESS);
    }

    #[test]
    fn decide_boundaries() {
        let project = python_project(&[]);
        let strict = CoverageChecker::new(
            config(project.path(), 80.0, true),
            ScriptedExecutor::coverage("{}", 0),
        );
        assert_eq!(strict.decide(80.0), EXIT_SUCCESS);
        assert_eq!(strict.decide(79.99), EXIT_FAILURE);
        assert_eq!(strict.decide(100.0), EXIT_SUCCESS);

        let lenient = CoverageChecker::new(
            config(project.path(), 80.0, false),
            ScriptedExecutor::coverage("{}", 0),
        );
        assert_eq!(lenient.decide(79.99), EXIT_SUCCESS);
    }
}
