use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use colored::Colorize;

use crate::{cli::ReportFormat, errors::CovError};

/// Step outputs appended to the file named by `GITHUB_OUTPUT`.
#[derive(Debug, Clone)]
pub struct GithubOutput {
    path: Option<PathBuf>,
    report_format: ReportFormat,
}

impl GithubOutput {
    pub fn new(path: Option<&Path>, report_format: ReportFormat) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            report_format,
        }
    }

    pub fn lines(&self, coverage_percentage: f64, tests_found: usize) -> String {
        format!(
            "coverage_percentage={:.2}\ntests_found={}\ncoverage_report={}\n",
            coverage_percentage,
            tests_found,
            self.report_format.report_location()
        )
    }

    fn append(&self, path: &Path, content: &str) -> Result<(), CovError> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// No-op without an output file. Write failures are logged, never returned.
    pub fn write(&self, coverage_percentage: f64, tests_found: usize) {
        let Some(path) = self.path.as_ref() else {
            return;
        };
        match self.append(path, &self.lines(coverage_percentage, tests_found)) {
            Ok(()) => println!("{}", "GitHub Action outputs set".green()),
            Err(e) => tracing::warn!(
                "Could not set GitHub outputs in {}: {}",
                path.display(),
                e
            ),
        }
    }
}
