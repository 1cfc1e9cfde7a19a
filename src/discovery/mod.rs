use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use glob::{MatchOptions, Pattern};
use itertools::Itertools;
use regex::Regex;

use crate::{
    errors::CovError,
    utils::{
        file_walking::collect_files,
        path_resolver::{get_relative_path, normalize},
    },
};

const TEST_FILE_PATTERN: &str = r"^(test_.*\.py|.*_test\.py|tests\.py)$";

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// De-duplicated test files in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestFileSet {
    files: Vec<PathBuf>,
}

impl TestFileSet {
    pub fn new(files: Vec<PathBuf>) -> Self {
        let files = files
            .into_iter()
            .map(|path| normalize(&path))
            .unique()
            .filter(|path| path.is_file())
            .collect();
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn command_arguments(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|path| path.to_string_lossy().to_string())
            .collect()
    }

    pub fn relative_to(&self, workspace: &Path) -> Vec<String> {
        self.files
            .iter()
            .map(|path| get_relative_path(workspace, path))
            .collect()
    }
}

fn glob_matches(workspace: &Path, spec: &str) -> Result<Vec<PathBuf>, CovError> {
    let pattern = if Path::new(spec).is_absolute() {
        spec.to_string()
    } else {
        let escaped_root = Pattern::escape(&workspace.to_string_lossy());
        format!("{}/{}", escaped_root.trim_end_matches('/'), spec)
    };
    Ok(glob::glob_with(&pattern, GLOB_OPTIONS)?
        .filter_map(Result::ok)
        .collect())
}

/// Resolves path specs against `workspace`. Specs with a `*` are globbed,
/// directories are walked for test modules, plain `.py` files are taken as is.
pub fn find_test_files(workspace: &Path, specs: &[String]) -> Result<TestFileSet, CovError> {
    let test_file_pattern = Regex::new(TEST_FILE_PATTERN)?;
    let mut candidates = vec![];

    for spec in specs {
        if spec.contains('*') {
            match glob_matches(workspace, spec) {
                Ok(matches) => candidates.extend(matches),
                Err(e) => tracing::warn!("Ignoring test path `{}`: {}", spec, e),
            }
            continue;
        }

        let full_path = workspace.join(spec);
        if full_path.is_dir() {
            candidates.extend(collect_files(&full_path, &test_file_pattern));
        } else if full_path.is_file() && full_path.extension() == Some(OsStr::new("py")) {
            candidates.push(full_path);
        } else {
            tracing::debug!("Test path `{}` is not a directory or Python file", spec);
        }
    }

    Ok(TestFileSet::new(candidates))
}
