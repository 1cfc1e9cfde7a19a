use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collects files under `root_folder` whose file name matches
/// `file_name_pattern`. Entries that cannot be read are skipped.
pub fn collect_files(root_folder: &Path, file_name_pattern: &Regex) -> Vec<PathBuf> {
    let mut files = vec![];
    for entry in WalkDir::new(root_folder).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.path().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if file_name_pattern.is_match(file_name) {
            files.push(entry.into_path());
        }
    }
    files
}
