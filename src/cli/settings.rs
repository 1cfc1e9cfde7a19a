use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::CovError;

pub const SETTING_KEYS: [&str; 6] = [
    "minimum-coverage",
    "test-paths",
    "source-paths",
    "exclude-paths",
    "fail-on-low-coverage",
    "report-format",
];

/// Parse a settings file of `key = value` lines. `#` starts a comment line.
pub fn parse_settings(settings_path: &Path) -> Result<HashMap<String, String>, CovError> {
    let file = File::open(settings_path)?;
    let reader = BufReader::new(file);
    let mut settings = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            if !SETTING_KEYS.contains(&key) {
                tracing::warn!(key, "Ignoring unknown setting");
                continue;
            }
            settings.insert(key.to_string(), value.trim().to_string());
        }
    }

    Ok(settings)
}
