//! Purpose: Shared data-directory and display-path resolution helpers.
//! Exports: `default_data_dir` and `absolute_display_path`.
//! Role: Keep CLI path semantics in one place.
//! Invariants: Default data directory remains `~/.dialogite`.
//! Invariants: Success messages always show absolute paths.

use std::path::{Path, PathBuf};

pub(crate) fn default_data_dir() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join(".dialogite")
}

pub(crate) fn absolute_display_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
