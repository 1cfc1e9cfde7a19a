use std::path::PathBuf;

use clap::ValueEnum;

pub mod cli_parser;
pub mod dependency_check;
pub mod settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Term,
    Html,
    Xml,
    Json,
}

impl ReportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Term => "term",
            ReportFormat::Html => "html",
            ReportFormat::Xml => "xml",
            ReportFormat::Json => "json",
        }
    }

    /// Location published to CI for this format. Fixed, whether or not the
    /// report was actually generated.
    pub fn report_location(&self) -> &'static str {
        match self {
            ReportFormat::Html => "htmlcov/index.html",
            ReportFormat::Xml => "coverage.xml",
            ReportFormat::Json => "coverage.json",
            ReportFormat::Term => "terminal_output",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Configuration {
    pub minimum_coverage: f64,
    pub test_paths: Vec<String>,
    pub source_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub fail_on_low_coverage: bool,
    pub report_format: ReportFormat,
    pub workspace: PathBuf,
    pub github_output: Option<PathBuf>,
}

pub fn split_paths(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(String::from)
        .collect()
}

pub fn parse_minimum_coverage(value: &str) -> Result<f64, crate::errors::CovError> {
    value.trim().parse::<f64>().map_err(|e| {
        crate::errors::CovError::InvalidArgument(format!(
            "Invalid minimum coverage `{}`: {}",
            value, e
        ))
    })
}

pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
