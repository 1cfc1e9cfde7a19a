use serde::Deserialize;

/// Subset of the file written by `coverage json`.
#[derive(Debug, Default, Deserialize)]
pub struct CoverageJson {
    #[serde(default)]
    pub totals: CoverageTotals,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoverageTotals {
    #[serde(default)]
    pub percent_covered: f64,
    pub covered_lines: Option<u64>,
    pub num_statements: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_totals() {
        let json = r#"{
            "meta": {"version": "7.4.0"},
            "files": {},
            "totals": {
                "covered_lines": 171,
                "num_statements": 200,
                "percent_covered": 85.5,
                "percent_covered_display": "86",
                "missing_lines": 29
            }
        }"#;
        let report: CoverageJson = serde_json::from_str(json).unwrap();
        assert_eq!(report.totals.percent_covered, 85.5);
        assert_eq!(report.totals.covered_lines, Some(171));
        assert_eq!(report.totals.num_statements, Some(200));
    }

    #[test]
    fn missing_keys_default_to_zero() {
        let report: CoverageJson = serde_json::from_str(r#"{"summary": "no totals key"}"#).unwrap();
        assert_eq!(report.totals.percent_covered, 0.0);

        let report: CoverageJson =
            serde_json::from_str(r#"{"totals": {"lines_covered": 100}}"#).unwrap();
        assert_eq!(report.totals.percent_covered, 0.0);
        assert_eq!(report.totals.covered_lines, None);
    }

    #[test]
    fn wrong_shapes_are_errors() {
        assert!(serde_json::from_str::<CoverageJson>(r#"{"totals": 5}"#).is_err());
        assert!(
            serde_json::from_str::<CoverageJson>(r#"{"totals": {"percent_covered": "high"}}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<CoverageJson>("invalid json").is_err());
    }
}
