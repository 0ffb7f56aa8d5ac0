use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::dedup::DedupOptions;
use crate::registry::spdx::DEFAULT_SPDX_URL;
use crate::scanner::headers::{DEFAULT_MAX_LOOKAHEAD, SOURCE_SUBDIRS};
use crate::scanner::walk::{EXTRACT_EXCLUDE_DIRS, HEADER_EXCLUDE_DIRS, LICENSE_EXCLUDE_DIRS};

const CONFIG_DIR: &str = ".license-builder";
const CONFIG_FILE: &str = "config.toml";

/// Root configuration structure, deserialized from `.license-builder/config.toml`.
/// Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub dedup: DedupConfig,
    pub licenses: LicensesConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names never entered while looking for LICENSE files.
    pub license_exclude_dirs: Vec<String>,
    /// Directory names never entered while reading source headers.
    pub header_exclude_dirs: Vec<String>,
    /// Subdirectories of each root that `extract` walks.
    pub extract_subdirs: Vec<String>,
    /// Directory names never entered by `extract`.
    pub extract_exclude_dirs: Vec<String>,
    /// Unrelated lines allowed between a copyright tag and its license tag.
    pub max_header_lookahead: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            license_exclude_dirs: LICENSE_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            header_exclude_dirs: HEADER_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            extract_subdirs: SOURCE_SUBDIRS.iter().map(|s| s.to_string()).collect(),
            extract_exclude_dirs: EXTRACT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            max_header_lookahead: DEFAULT_MAX_LOOKAHEAD,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub normalize_years: bool,
    pub deduplicate_rapids: bool,
    pub handle_cccl: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            normalize_years: true,
            deduplicate_rapids: true,
            handle_cccl: true,
        }
    }
}

impl DedupConfig {
    pub fn to_options(&self) -> DedupOptions {
        DedupOptions {
            handle_cccl: self.handle_cccl,
            deduplicate_rapids: self.deduplicate_rapids,
            normalize_years: self.normalize_years,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LicensesConfig {
    /// Holds `common_licenses/` and `infrequent_licenses/`.
    pub cache_dir: Option<PathBuf>,
    pub spdx_url: String,
    /// Resolve license texts from the cache only.
    pub offline: bool,
}

impl Default for LicensesConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            spdx_url: DEFAULT_SPDX_URL.to_string(),
            offline: false,
        }
    }
}

impl LicensesConfig {
    /// Configured cache directory, else `<user cache dir>/license-builder`, else `./.license-builder/licenses`.
    pub fn resolved_cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        dirs::cache_dir()
            .map(|d| d.join("license-builder"))
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("licenses"))
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parse {}", path.display()))
}

/// Load configuration, searching in order:
///
/// 1. `config_override`, the path passed via `--config`
/// 2. `<project_path>/.license-builder/config.toml`
/// 3. `~/.config/license-builder/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: Option<&Path>, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    if let Some(project_path) = project_path {
        let project_config = project_path.join(CONFIG_DIR).join(CONFIG_FILE);
        if project_config.exists() {
            return read_config(&project_config);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-builder")
            .join(CONFIG_FILE);
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.scan.max_header_lookahead, 10);
        assert!(cfg.scan.license_exclude_dirs.contains(&"node_modules".to_string()));
        assert!(!cfg.scan.license_exclude_dirs.contains(&"third_party".to_string()));
        assert_eq!(cfg.scan.extract_subdirs, vec!["c", "cpp"]);
        assert_eq!(cfg.scan.extract_exclude_dirs, vec!["benchmark", "cmake", "test", "tests"]);
        assert_eq!(cfg.dedup.to_options(), DedupOptions::default());
        assert_eq!(cfg.licenses.spdx_url, "https://spdx.org/licenses");
        assert!(!cfg.licenses.offline);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[dedup]").unwrap();
        writeln!(f, "deduplicate_rapids = false").unwrap();
        writeln!(f, "[licenses]").unwrap();
        writeln!(f, "offline = true").unwrap();
        writeln!(f, "cache_dir = \"/srv/licenses\"").unwrap();

        let cfg = load_config(None, Some(f.path())).unwrap();
        assert!(!cfg.dedup.deduplicate_rapids);
        assert!(cfg.dedup.handle_cccl);
        assert!(cfg.licenses.offline);
        assert_eq!(cfg.licenses.resolved_cache_dir(), PathBuf::from("/srv/licenses"));
        assert_eq!(cfg.scan.max_header_lookahead, 10);
    }

    #[test]
    fn test_project_config_found() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(CONFIG_FILE),
            "[scan]\nmax_header_lookahead = 25\nlicense_exclude_dirs = [\".git\"]\n",
        )
        .unwrap();

        let cfg = load_config(Some(tmp.path()), None).unwrap();
        assert_eq!(cfg.scan.max_header_lookahead, 25);
        assert_eq!(cfg.scan.license_exclude_dirs, vec![".git"]);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[dedup").unwrap();
        assert!(load_config(None, Some(f.path())).is_err());
    }
}
