//! Static project classification used by the deduplication passes.

use std::path::Path;

use crate::attribution::path_segments;
use crate::models::Ecosystem;

/// RAPIDS projects. All of them ship Apache-2.0.
pub const RAPIDS_PROJECTS: &[&str] = &[
    "cudf",
    "cuml",
    "cugraph",
    "cuspatial",
    "cuxfilter",
    "cucim",
    "raft",
    "cuco",
    "cupy",
    "rmm",
    "kvikio",
    "ucx-py",
];

/// NVIDIA projects distributed under Apache-2.0.
pub const NVIDIA_PROJECTS: &[&str] = &[
    "cccl",
    "cutlass",
    "thrust",
    "cub",
    "libcudacxx",
    "cudf",
    "cuml",
    "cugraph",
    "cuspatial",
    "cuxfilter",
    "cucim",
    "raft",
    "cuco",
];

/// Libraries bundled inside CCCL whose licenses the CCCL root LICENSE covers.
pub const CCCL_COMPONENTS: &[&str] = &["cub", "thrust", "libcudacxx"];

const CCCL_ROOT: &str = "cccl";

/// Lowercase a segment and drop a trailing `-src` / `_src`.
fn clean_segment(segment: &str) -> String {
    let lower = segment.to_lowercase();
    match lower
        .strip_suffix("-src")
        .or_else(|| lower.strip_suffix("_src"))
    {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

fn any_segment_in(path: &Path, names: &[&str]) -> bool {
    path_segments(path)
        .iter()
        .any(|s| names.contains(&clean_segment(s).as_str()))
}

pub fn is_rapids_project(path: &Path) -> bool {
    any_segment_in(path, RAPIDS_PROJECTS)
}

pub fn is_nvidia_project(path: &Path) -> bool {
    any_segment_in(path, NVIDIA_PROJECTS)
}

/// The CCCL component a path lives under, scanning from the file upward.
pub fn cccl_component(path: &Path) -> Option<&'static str> {
    path_segments(path).iter().rev().find_map(|s| {
        let clean = clean_segment(s);
        CCCL_COMPONENTS.iter().copied().find(|c| *c == clean)
    })
}

/// True when some segment is `cccl` (or `cccl-src`) and the segment after it,
/// if any, is not a CCCL component.
pub fn is_cccl_root(path: &Path) -> bool {
    let segments = path_segments(path);
    segments.iter().enumerate().any(|(i, s)| {
        if clean_segment(s) != CCCL_ROOT {
            return false;
        }
        match segments.get(i + 1) {
            Some(next) => !CCCL_COMPONENTS.contains(&next.to_lowercase().as_str()),
            None => true,
        }
    })
}

/// Label for report output. RAPIDS takes precedence since it is the narrower set.
pub fn classify(path: &Path) -> Option<Ecosystem> {
    if is_rapids_project(path) {
        Some(Ecosystem::Rapids)
    } else if is_nvidia_project(path) {
        Some(Ecosystem::Nvidia)
    } else {
        None
    }
}
