use std::path::{Component, Path, PathBuf};

/// Path relative to `parent` for display, falling back to the full path.
pub fn get_relative_path(parent: &Path, full_path: &Path) -> String {
    full_path
        .strip_prefix(parent)
        .unwrap_or(full_path)
        .to_string_lossy()
        .to_string()
}

/// Drops `.` components so `ws/./tests/a.py` and `ws/tests/a.py` compare equal.
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
