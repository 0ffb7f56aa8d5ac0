//! Positional heuristics that attribute a file path to a project.
//!
//! Two markers are recognised, scanning from the file toward the root:
//! - a `<name>-src` directory (as laid out by CMake `FetchContent` / CPM); it always wins;
//! - a `c` or `cpp` directory, whose parent is taken as the project name.

use std::path::{Component, Path};

use crate::models::ProjectAttribution;

const SRC_SUFFIX: &str = "-src";
const LANGUAGE_DIRS: [&str; 2] = ["c", "cpp"];

/// Split a path into its named segments. Root and prefix components are dropped,
/// `.` is skipped and `..` is kept verbatim.
pub fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect()
}

/// Attribute `path` to a project and compute its path inside that project.
///
/// Falls back to `(None, <basename>)` when neither heuristic applies.
/// The filesystem root is not a segment, so in `/cpp/x.cpp` the `cpp` directory is
/// the first segment and attributes nothing.
pub fn project_relative_path(path: &Path) -> ProjectAttribution {
    let segments = path_segments(path);
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut language_dir_match: Option<ProjectAttribution> = None;

    for i in (0..segments.len()).rev() {
        let segment = &segments[i];

        if language_dir_match.is_none() && i > 0 && LANGUAGE_DIRS.contains(&segment.as_str()) {
            language_dir_match = Some(ProjectAttribution {
                project_name: Some(segments[i - 1].clone()),
                relative_path: segments[i..].join("/"),
            });
        }

        if let Some(project) = segment.strip_suffix(SRC_SUFFIX) {
            let remaining = &segments[i + 1..];
            let relative_path = if remaining.is_empty() {
                filename
            } else {
                remaining.join("/")
            };
            return ProjectAttribution {
                project_name: Some(project.to_string()),
                relative_path,
            };
        }
    }

    language_dir_match.unwrap_or(ProjectAttribution {
        project_name: None,
        relative_path: filename,
    })
}
