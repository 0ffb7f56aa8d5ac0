use std::path::{Path, PathBuf};

use log::warn;
use walkdir::{DirEntry, WalkDir};

/// Directories skipped while looking for LICENSE files. `third_party` and
/// `thirdparty` must never appear here: vendored licenses live there.
pub const LICENSE_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".github",
    "build",
    "dist",
    "_build",
    "node_modules",
    "venv",
    ".venv",
    "python",
    "cmake",
    "rust",
    "test",
    "tests",
    "benchmark",
    "benchmarks",
    "docs",
    "examples",
];

/// Directories skipped while scanning source files for SPDX headers.
pub const HEADER_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".github",
    "build",
    "dist",
    "_build",
    "node_modules",
    "venv",
    ".venv",
    "benchmark",
    "benchmarks",
    "cmake",
    "test",
    "tests",
    "docs",
    "examples",
];

/// Directories skipped by `extract`, which only walks language source trees.
pub const EXTRACT_EXCLUDE_DIRS: &[&str] = &["benchmark", "cmake", "test", "tests"];

fn is_excluded(entry: &DirEntry, exclude: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && exclude
            .iter()
            .any(|name| entry.file_name().to_str() == Some(name.as_str()))
}

/// Symlinks are not followed while walking, so a link counts when its target is a file.
fn is_regular_or_linked_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    if entry.path().is_file() {
        return true;
    }
    if !entry.path().exists() {
        warn!("Skipping dangling symlink {}", entry.path().display());
    }
    false
}

/// Every regular file (or symlink to one) under `root` accepted by `keep`, in file-name order.
/// Excluded directory names are pruned without being entered.
pub fn walk_files<F>(root: &Path, exclude: &[String], keep: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> bool,
{
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e, exclude))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                None
            }
        })
        .filter(is_regular_or_linked_file)
        .filter(|e| e.file_name().to_str().map(|n| keep(n)).unwrap_or(false))
        .map(|e| e.into_path())
        .collect()
}
