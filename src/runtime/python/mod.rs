pub mod coverage;
pub mod coverage_report;
