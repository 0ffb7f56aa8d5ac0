//! Reduction of LICENSE content groups that are the same license for reporting purposes.
//!
//! Three passes run in a fixed order, each over the output of the previous one:
//! 1. CCCL component suppression ([`suppress_cccl_components`])
//! 2. RAPIDS Apache consolidation ([`consolidate_rapids`])
//! 3. copyright-year normalization ([`merge_normalized_years`])
//!
//! Every pass is a fold over the ordered groups; merging goes through
//! [`LicenseGroup::merge`] so the first-seen group keeps its key and text.

pub mod ecosystem;
pub mod normalize;

use std::collections::HashMap;

use log::debug;

use crate::models::LicenseGroup;
use ecosystem::{cccl_component, is_cccl_root, is_rapids_project};
use normalize::normalized_digest;

/// Which reduction passes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupOptions {
    pub handle_cccl: bool,
    pub deduplicate_rapids: bool,
    pub normalize_years: bool,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            handle_cccl: true,
            deduplicate_rapids: true,
            normalize_years: true,
        }
    }
}

#[cfg(test)]
impl DedupOptions {
    pub fn none() -> Self {
        Self {
            handle_cccl: false,
            deduplicate_rapids: false,
            normalize_years: false,
        }
    }
}

/// Run the enabled passes over `groups`. With every pass disabled this is the identity.
pub fn deduplicate(groups: Vec<LicenseGroup>, options: &DedupOptions) -> Vec<LicenseGroup> {
    let mut groups = groups;
    let before = groups.len();

    if options.handle_cccl {
        groups = suppress_cccl_components(groups);
    }
    if options.deduplicate_rapids {
        groups = consolidate_rapids(groups);
    }
    if options.normalize_years {
        groups = merge_normalized_years(groups);
    }

    debug!("deduplicated {} license groups into {}", before, groups.len());
    groups
}

/// Drop groups found only inside CCCL components when a CCCL root LICENSE
/// exists anywhere in the scan.
pub fn suppress_cccl_components(groups: Vec<LicenseGroup>) -> Vec<LicenseGroup> {
    let has_root = groups
        .iter()
        .flat_map(|g| g.paths.keys())
        .any(|p| is_cccl_root(p));
    if !has_root {
        return groups;
    }

    groups
        .into_iter()
        .filter(|g| {
            let component_only = g.paths.keys().all(|p| cccl_component(p).is_some());
            if component_only {
                debug!("dropping CCCL component license {}", g.key);
            }
            !component_only
        })
        .collect()
}

/// An Apache-licensed group whose every location is inside a RAPIDS project.
///
/// Only the substring is checked, not the full body: two RAPIDS projects with
/// differing Apache texts still collapse into one.
pub fn is_rapids_apache(group: &LicenseGroup) -> bool {
    (group.content.contains("Apache License") || group.content.contains("Apache-2.0"))
        && group.paths.keys().all(|p| is_rapids_project(p))
}

/// Fold every RAPIDS Apache group into the first one encountered.
pub fn consolidate_rapids(groups: Vec<LicenseGroup>) -> Vec<LicenseGroup> {
    let mut result: Vec<LicenseGroup> = Vec::with_capacity(groups.len());
    let mut representative: Option<usize> = None;

    for group in groups {
        if !is_rapids_apache(&group) {
            result.push(group);
            continue;
        }
        match representative {
            Some(idx) => {
                debug!("merging RAPIDS license {} into {}", group.key, result[idx].key);
                let rep = std::mem::take(&mut result[idx]);
                result[idx] = rep.merge(group);
            }
            None => {
                representative = Some(result.len());
                result.push(group);
            }
        }
    }

    result
}

/// Merge groups whose texts are identical once copyright years are normalized.
pub fn merge_normalized_years(groups: Vec<LicenseGroup>) -> Vec<LicenseGroup> {
    let mut result: Vec<LicenseGroup> = Vec::with_capacity(groups.len());
    let mut by_digest: HashMap<String, usize> = HashMap::new();

    for group in groups {
        let digest = normalized_digest(&group.content);
        match by_digest.get(&digest) {
            Some(&idx) => {
                debug!("merging year variant {} into {}", group.key, result[idx].key);
                let existing = std::mem::take(&mut result[idx]);
                result[idx] = existing.merge(group);
            }
            None => {
                by_digest.insert(digest, result.len());
                result.push(group);
            }
        }
    }

    result
}
