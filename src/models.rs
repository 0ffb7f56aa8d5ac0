use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// All LICENSE files that share one exact content, keyed by its SHA-256 digest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseGroup {
    /// Hex SHA-256 of `content`.
    pub key: String,
    pub content: String,
    /// Distinct basenames seen for this content (`LICENSE`, `LICENSE.txt`, ...).
    pub filenames: BTreeSet<String>,
    /// Absolute path → project-relative path.
    pub paths: BTreeMap<PathBuf, String>,
}

impl LicenseGroup {
    pub fn new(key: String, content: String) -> Self {
        Self {
            key,
            content,
            filenames: BTreeSet::new(),
            paths: BTreeMap::new(),
        }
    }

    /// Record one sighting of this content. Re-recording a path is a no-op.
    pub fn record(&mut self, path: PathBuf, relative_path: String, filename: String) {
        self.filenames.insert(filename);
        self.paths.insert(path, relative_path);
    }

    /// Fold `other`'s locations into `self`. Key and content stay those of `self`.
    pub fn merge(mut self, other: LicenseGroup) -> LicenseGroup {
        self.filenames.extend(other.filenames);
        self.paths.extend(other.paths);
        self
    }
}

/// One `(license, years, owner)` triple pulled from an SPDX header block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CopyrightEntry {
    pub license_id: String,
    /// May be empty when the copyright line carries no year.
    pub year_range: String,
    pub owner: String,
    pub file_path: PathBuf,
}

/// Header-derived licensing for every file sharing one basename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFileLicenses {
    pub paths: BTreeSet<PathBuf>,
    /// `(license_id, year_range, owner)`
    pub licenses: BTreeSet<(String, String, String)>,
}

/// Where a path sits inside a recognised project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAttribution {
    pub project_name: Option<String>,
    pub relative_path: String,
}

/// Known ecosystems a path can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Rapids,
    Nvidia,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_unions_locations() {
        let mut a = LicenseGroup::new("a".into(), "text a".into());
        a.record("/x/LICENSE".into(), "LICENSE".into(), "LICENSE".into());
        let mut b = LicenseGroup::new("b".into(), "text b".into());
        b.record("/y/LICENSE.txt".into(), "LICENSE.txt".into(), "LICENSE.txt".into());
        b.record("/x/LICENSE".into(), "LICENSE".into(), "LICENSE".into());

        let merged = a.merge(b);
        assert_eq!(merged.key, "a");
        assert_eq!(merged.content, "text a");
        assert_eq!(merged.paths.len(), 2);
        assert_eq!(merged.filenames.len(), 2);
    }
}
