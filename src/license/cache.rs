use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

pub const COMMON_DIR: &str = "common_licenses";
pub const INFREQUENT_DIR: &str = "infrequent_licenses";

/// Local store of canonical license texts, keyed by SPDX identifier.
pub trait LicenseCache {
    fn get(&self, id: &str) -> Option<String>;
    fn put(&self, id: &str, text: &str) -> Result<()>;
}

/// `<base>/common_licenses/<id>.txt` then `<base>/infrequent_licenses/<id>.txt`.
/// New texts are written to the infrequent directory.
///
/// Writes are last-writer-wins; concurrent processes sharing a cache are not coordinated.
#[derive(Debug, Clone)]
pub struct DirCache {
    base: PathBuf,
}

impl DirCache {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn file_in(&self, dir: &str, id: &str) -> PathBuf {
        self.base.join(dir).join(format!("{}.txt", id))
    }
}

/// Identifiers become file names, so anything that could escape the cache directory is refused.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+' | '_'))
}

impl LicenseCache for DirCache {
    fn get(&self, id: &str) -> Option<String> {
        if !is_safe_id(id) {
            return None;
        }
        for dir in [COMMON_DIR, INFREQUENT_DIR] {
            let path = self.file_in(dir, id);
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some(text),
                Err(err) => warn!("Could not read license file {}: {}", path.display(), err),
            }
        }
        None
    }

    fn put(&self, id: &str, text: &str) -> Result<()> {
        if !is_safe_id(id) {
            anyhow::bail!("refusing to cache license with identifier {:?}", id);
        }
        let dir = self.base.join(INFREQUENT_DIR);
        std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let path = self.file_in(INFREQUENT_DIR, id);
        std::fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_common_takes_priority() {
        let tmp = TempDir::new().unwrap();
        for (dir, text) in [(COMMON_DIR, "common MIT"), (INFREQUENT_DIR, "infrequent MIT")] {
            std::fs::create_dir_all(tmp.path().join(dir)).unwrap();
            std::fs::write(tmp.path().join(dir).join("MIT.txt"), text).unwrap();
        }
        let cache = DirCache::new(tmp.path());
        assert_eq!(cache.get("MIT").as_deref(), Some("common MIT"));
    }

    #[test]
    fn test_put_then_get() {
        let tmp = TempDir::new().unwrap();
        let cache = DirCache::new(tmp.path().join("cache"));
        assert_eq!(cache.get("Zlib"), None);

        cache.put("Zlib", "zlib License").unwrap();
        assert!(tmp.path().join("cache/infrequent_licenses/Zlib.txt").exists());
        assert_eq!(cache.get("Zlib").as_deref(), Some("zlib License"));
    }

    #[test]
    fn test_unsafe_ids_rejected() {
        let tmp = TempDir::new().unwrap();
        let cache = DirCache::new(tmp.path());
        assert!(cache.put("../escape", "x").is_err());
        assert_eq!(cache.get("../escape"), None);
        assert!(cache.put("", "x").is_err());
    }
}
