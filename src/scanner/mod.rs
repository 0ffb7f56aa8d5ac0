//! Directory scanners feeding the report.
//!
//! - [`headers`]: SPDX copyright/license header tags in source files.
//! - [`license_files`]: standalone `LICENSE*` files grouped by content.
//!
//! Both walk each root through [`walk`] and absorb per-file read failures;
//! nothing below this layer fails a scan once the roots are validated.

use std::path::{Path, PathBuf};

use log::info;

pub mod headers;
pub mod license_files;
pub mod walk;

/// Counters reported after a root has been scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files read.
    pub files: usize,
    /// Header entries or LICENSE files recorded.
    pub matches: usize,
}

impl std::ops::AddAssign for ScanStats {
    fn add_assign(&mut self, rhs: Self) {
        self.files += rhs.files;
        self.matches += rhs.matches;
    }
}

pub trait Scanner {
    /// Accumulator shared across roots. Scanning a root twice must not duplicate entries.
    type Output: Default;

    fn scan(&self, root: &Path, into: &mut Self::Output) -> ScanStats;

    /// Scan every root in order into one accumulator.
    fn scan_all(&self, roots: &[PathBuf]) -> (Self::Output, ScanStats) {
        let mut output = Self::Output::default();
        let mut total = ScanStats::default();
        for root in roots {
            let stats = self.scan(root, &mut output);
            info!(
                "{}: read {} files, recorded {}",
                root.display(),
                stats.files,
                stats.matches
            );
            total += stats;
        }
        (output, total)
    }
}

/// Decode UTF-8, dropping any byte sequences that are not valid.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
