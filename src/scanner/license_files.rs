use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::warn;
use sha2::{Digest, Sha256};

use super::walk::walk_files;
use super::{decode_lossy, ScanStats, Scanner};
use crate::attribution::project_relative_path;
use crate::models::LicenseGroup;

const LICENSE_PREFIX: &str = "LICENSE";

/// Hex SHA-256 of license text.
pub fn content_key(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// LICENSE groups in first-seen order, indexed by content key.
#[derive(Debug, Default)]
pub struct LicenseCatalog {
    groups: Vec<LicenseGroup>,
    index: HashMap<String, usize>,
}

impl LicenseCatalog {
    /// Record `path` under the group for `content`, creating the group on first sight.
    pub fn insert(&mut self, path: PathBuf, content: String) {
        let key = content_key(&content);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.groups.push(LicenseGroup::new(key.clone(), content));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        let relative_path = project_relative_path(&path).relative_path;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.groups[idx].record(path, relative_path, filename);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[LicenseGroup] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<LicenseGroup> {
        self.groups
    }
}

/// Finds `LICENSE*` files under a root and groups them by exact content.
pub struct LicenseFileScanner {
    exclude_dirs: Vec<String>,
}

impl LicenseFileScanner {
    pub fn new(exclude_dirs: Vec<String>) -> Self {
        Self { exclude_dirs }
    }
}

impl Scanner for LicenseFileScanner {
    type Output = LicenseCatalog;

    fn scan(&self, root: &Path, into: &mut LicenseCatalog) -> ScanStats {
        let files = walk_files(root, &self.exclude_dirs, |name| name.starts_with(LICENSE_PREFIX));
        let mut stats = ScanStats::default();

        for path in files {
            stats.files += 1;
            match std::fs::read(&path) {
                Ok(bytes) => {
                    into.insert(path, decode_lossy(&bytes));
                    stats.matches += 1;
                }
                Err(err) => warn!("Could not read {}: {}", path.display(), err),
            }
        }

        stats
    }
}
