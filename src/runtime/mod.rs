pub mod python;

/// Outcome of the measured test run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// Whether reporting should proceed.
    pub success: bool,
    pub output: String,
    pub return_code: Option<i32>,
}

impl ExecutionResult {
    pub fn not_started(output: &str) -> Self {
        Self {
            success: false,
            output: output.to_string(),
            return_code: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    pub percentage: f64,
    pub body: String,
    pub covered_lines: Option<u64>,
    pub num_statements: Option<u64>,
}

impl CoverageReport {
    pub fn empty() -> Self {
        Self::default()
    }
}
