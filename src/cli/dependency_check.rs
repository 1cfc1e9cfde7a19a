use std::path::Path;

use colored::Colorize;
use tabled::{Table, Tabled, settings::Style};

use crate::{
    errors::CovError,
    utils::process::{CommandExecutor, display_command},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Installed,
    /// Executable not on `PATH`.
    Missing,
    /// Ran, but exited with a failure (e.g. `python -m pytest` without pytest).
    Broken,
}

impl ToolStatus {
    fn label(&self) -> &'static str {
        match self {
            ToolStatus::Installed => "installed",
            ToolStatus::Missing => "not found",
            ToolStatus::Broken => "failed",
        }
    }
}

struct RequiredTool {
    name: &'static str,
    version_command: &'static [&'static str],
    purpose: &'static str,
}

const REQUIRED_TOOLS: [RequiredTool; 3] = [
    RequiredTool {
        name: "python",
        version_command: &["python", "--version"],
        purpose: "Python interpreter",
    },
    RequiredTool {
        name: "coverage",
        version_command: &["coverage", "--version"],
        purpose: "Runs the tests and measures coverage",
    },
    RequiredTool {
        name: "pytest",
        version_command: &["python", "-m", "pytest", "--version"],
        purpose: "Test runner driven by coverage",
    },
];

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Tool")]
    name: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Used for")]
    purpose: &'static str,
}

#[derive(Debug)]
pub struct ToolReport {
    pub name: &'static str,
    pub status: ToolStatus,
    pub version: Option<String>,
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from)
}

fn inspect<E: CommandExecutor>(executor: &E, tool: &RequiredTool, cwd: &Path) -> ToolReport {
    let command: Vec<String> = tool.version_command.iter().map(|arg| arg.to_string()).collect();
    tracing::debug!("Running {}", display_command(&command));
    let (status, version) = match executor.execute(&command, cwd) {
        // Older pythons print `--version` to stderr.
        Ok(output) if output.success() => (
            ToolStatus::Installed,
            first_line(&output.stdout).or_else(|| first_line(&output.stderr)),
        ),
        Ok(output) => {
            tracing::debug!(exit_code = ?output.status, "{} failed: {}", tool.name, output.stderr.trim());
            (ToolStatus::Broken, None)
        }
        Err(CovError::ToolNotFound(_)) => (ToolStatus::Missing, None),
        Err(e) => {
            tracing::debug!("{} could not be checked: {}", tool.name, e);
            (ToolStatus::Broken, None)
        }
    };
    ToolReport {
        name: tool.name,
        status,
        version,
    }
}

/// Checks every tool a coverage run needs, from `cwd`.
pub fn inspect_tools<E: CommandExecutor>(executor: &E, cwd: &Path) -> Vec<ToolReport> {
    REQUIRED_TOOLS
        .iter()
        .map(|tool| inspect(executor, tool, cwd))
        .collect()
}

/// Prints the tool table. Returns true when every tool is installed.
pub fn check_dependencies<E: CommandExecutor>(executor: &E, cwd: &Path) -> bool {
    println!("\n{}\n", "covgate dependency check".bold());

    let reports = inspect_tools(executor, cwd);
    let rows = reports.iter().zip(REQUIRED_TOOLS.iter()).map(|(report, tool)| ToolRow {
        name: report.name,
        status: report.status.label(),
        version: report.version.clone().unwrap_or_default(),
        purpose: tool.purpose,
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);

    let missing: Vec<&str> = reports
        .iter()
        .filter(|report| report.status != ToolStatus::Installed)
        .map(|report| report.name)
        .collect();
    if missing.is_empty() {
        println!("{}", "All required tools are available".green().bold());
        return true;
    }
    println!(
        "{}",
        format!(
            "Unavailable: {}. Install them with `pip install coverage pytest`",
            missing.join(", ")
        )
        .red()
        .bold()
    );
    false
}
