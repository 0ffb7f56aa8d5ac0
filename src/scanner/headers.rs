//! SPDX header extraction.
//!
//! A header block opens with a non-NVIDIA `SPDX-FileCopyrightText:` line, may
//! collect further copyright lines, and closes on `SPDX-License-Identifier:`.
//! Every collected copyright is emitted with that license. Blocks that never
//! close within [`DEFAULT_MAX_LOOKAHEAD`] unrelated lines are dropped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use super::walk::walk_files;
use super::{decode_lossy, ScanStats, Scanner};
use crate::license::spdx::clean_license_id;
use crate::models::{CopyrightEntry, SourceFileLicenses};

const COPYRIGHT_TAG: &str = "SPDX-FileCopyrightText:";
const LICENSE_TAG: &str = "SPDX-License-Identifier:";

/// Unrelated lines tolerated between the first copyright line and the license line.
pub const DEFAULT_MAX_LOOKAHEAD: usize = 10;

/// Subdirectories of each root that `extract` scans.
pub const SOURCE_SUBDIRS: &[&str] = &["c", "cpp"];

/// Header entries keyed by file basename.
pub type HeaderMap = BTreeMap<String, SourceFileLicenses>;

// Copyright (c) <years> <owner>
static WITH_MARKER_AND_YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Copyright\s*\(c\)\s*([\d\-,\s]+)\s+(.+?)(?:\.\s*All rights reserved\.?)?$")
        .unwrap()
});

// Copyright (<years>) <owner>
static PARENTHESIZED_YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Copyright\s*\(([\d\-,\s]+)\)\s+(.+?)(?:\.\s*All rights reserved\.?)?$")
        .unwrap()
});

// Copyright (c) <owner>
static WITH_MARKER_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Copyright\s*\(c\)\s+(.+?)(?:\.\s*All rights reserved\.?)?$").unwrap()
});

// Copyright <years> <owner>
static BARE_YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Copyright\s+([\d\-,\s]+)\s+(.+?)(?:\.\s*All rights reserved\.?)?$").unwrap()
});

static RIGHTS_RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[\s.,;]*all rights reserved\.?$").unwrap());

fn is_nvidia(line: &str) -> bool {
    line.to_uppercase().contains("NVIDIA")
}

fn clean_years(raw: &str) -> String {
    raw.trim().trim_end_matches(',').trim_end().to_string()
}

fn clean_owner(raw: &str) -> Option<String> {
    let owner = RIGHTS_RESERVED.replace(raw.trim(), "");
    let owner = owner
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';') || c.is_whitespace())
        .trim();
    (!owner.is_empty()).then(|| owner.to_string())
}

fn looks_like_years(candidate: &str) -> bool {
    candidate.chars().any(|c| c.is_ascii_digit())
        && candidate
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == ',' || c.is_whitespace())
}

/// Pull `(year_range, owner)` out of one copyright line. The year range is empty
/// when the line carries none. Returns `None` when no known form matches.
///
/// ```text
/// "Copyright (c) 2014-2022 Frank Example"          -> ("2014-2022", "Frank Example")
/// "Copyright (2019) Sandia Corporation"            -> ("2019", "Sandia Corporation")
/// "Copyright (c) Facebook, Inc. and its affiliates." -> ("", "Facebook, Inc. and its affiliates")
/// ```
pub fn extract_copyright_info(line: &str) -> Option<(String, String)> {
    for re in [&*WITH_MARKER_AND_YEARS, &*PARENTHESIZED_YEARS] {
        if let Some(caps) = re.captures(line) {
            if let Some(owner) = clean_owner(&caps[2]) {
                return Some((clean_years(&caps[1]), owner));
            }
        }
    }

    if let Some(caps) = WITH_MARKER_ONLY.captures(line) {
        if let Some(owner) = clean_owner(&caps[1]) {
            return Some((String::new(), owner));
        }
    }

    // Only accept the bare form when the first word really is a year list,
    // otherwise "Copyright Foo Bar" would read "Foo" as a year.
    if let Some(caps) = BARE_YEARS.captures(line) {
        let years = caps[1].trim();
        if looks_like_years(years) {
            if let Some(owner) = clean_owner(&caps[2]) {
                return Some((clean_years(years), owner));
            }
        }
    }

    None
}

fn license_identifier(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(LICENSE_TAG)?;
    let id = clean_license_id(rest);
    (!id.is_empty()).then_some(id)
}

/// Extract every non-NVIDIA copyright entry in `text`, in discovery order.
pub fn find_spdx_entries(text: &str, file_path: &Path, max_lookahead: usize) -> Vec<CopyrightEntry> {
    let mut entries = Vec::new();
    let mut lines = text.lines().map(str::trim);

    while let Some(line) = lines.next() {
        if !line.contains(COPYRIGHT_TAG) || is_nvidia(line) {
            continue;
        }

        let mut pending: Vec<(String, String)> = extract_copyright_info(line).into_iter().collect();
        let mut unrelated = 0;

        for next in lines.by_ref() {
            if next.contains(LICENSE_TAG) {
                if let Some(license_id) = license_identifier(next) {
                    entries.extend(pending.drain(..).map(|(year_range, owner)| CopyrightEntry {
                        license_id: license_id.clone(),
                        year_range,
                        owner,
                        file_path: file_path.to_path_buf(),
                    }));
                }
                break;
            } else if next.contains(COPYRIGHT_TAG) {
                if !is_nvidia(next) {
                    pending.extend(extract_copyright_info(next));
                }
            } else {
                unrelated += 1;
                if unrelated > max_lookahead {
                    break;
                }
            }
        }
    }

    entries
}

/// Read one file and extract its entries. Unreadable files yield nothing.
pub fn scan_file(path: &Path, max_lookahead: usize) -> Vec<CopyrightEntry> {
    match std::fs::read(path) {
        Ok(bytes) => find_spdx_entries(&decode_lossy(&bytes), path, max_lookahead),
        Err(err) => {
            warn!("Skipping {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

/// Fold entries into the per-basename map.
pub fn record_entries(map: &mut HeaderMap, entries: Vec<CopyrightEntry>) {
    for entry in entries {
        let filename = entry
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let info = map.entry(filename).or_default();
        info.paths.insert(entry.file_path);
        info.licenses
            .insert((entry.license_id, entry.year_range, entry.owner));
    }
}

/// Scans every file under a root for SPDX header blocks.
pub struct HeaderScanner {
    exclude_dirs: Vec<String>,
    max_lookahead: usize,
}

impl HeaderScanner {
    pub fn new(exclude_dirs: Vec<String>, max_lookahead: usize) -> Self {
        Self {
            exclude_dirs,
            max_lookahead,
        }
    }
}

impl Scanner for HeaderScanner {
    type Output = HeaderMap;

    fn scan(&self, root: &Path, into: &mut HeaderMap) -> ScanStats {
        let files: Vec<PathBuf> = walk_files(root, &self.exclude_dirs, |_| true);
        let mut stats = ScanStats {
            files: files.len(),
            matches: 0,
        };

        for path in files {
            let entries = scan_file(&path, self.max_lookahead);
            stats.matches += entries.len();
            record_entries(into, entries);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::walk::HEADER_EXCLUDE_DIRS;
    use tempfile::TempDir;

    fn entries(text: &str) -> Vec<(String, String, String)> {
        find_spdx_entries(text, Path::new("/src/x.h"), DEFAULT_MAX_LOOKAHEAD)
            .into_iter()
            .map(|e| (e.license_id, e.year_range, e.owner))
            .collect()
    }

    fn triple(l: &str, y: &str, o: &str) -> (String, String, String) {
        (l.to_string(), y.to_string(), o.to_string())
    }

    #[test]
    fn test_copyright_forms() {
        assert_eq!(
            extract_copyright_info("Copyright (c) 2014-2022 Frank Example"),
            Some(("2014-2022".into(), "Frank Example".into()))
        );
        assert_eq!(
            extract_copyright_info("Copyright (2019) Sandia Corporation"),
            Some(("2019".into(), "Sandia Corporation".into()))
        );
        assert_eq!(
            extract_copyright_info("Copyright (c) Facebook, Inc. and its affiliates."),
            Some(("".into(), "Facebook, Inc. and its affiliates".into()))
        );
        assert_eq!(
            extract_copyright_info("Copyright 2008-2011 Google Inc."),
            Some(("2008-2011".into(), "Google Inc".into()))
        );
    }

    #[test]
    fn test_rights_reserved_is_stripped() {
        assert_eq!(
            extract_copyright_info("SPDX-FileCopyrightText: Copyright (C) 2020, Foo Corp. All rights reserved."),
            Some(("2020".into(), "Foo Corp".into()))
        );
        assert_eq!(
            extract_copyright_info("Copyright (c) 2021 Bar Ltd, all rights reserved"),
            Some(("2021".into(), "Bar Ltd".into()))
        );
    }

    #[test]
    fn test_spaced_trailing_punctuation_is_stripped() {
        assert_eq!(
            extract_copyright_info("Copyright (c) 2020 Foo Corp. ,"),
            Some(("2020".into(), "Foo Corp".into()))
        );
        assert_eq!(
            extract_copyright_info("Copyright 2019 Baz Inc ; ."),
            Some(("2019".into(), "Baz Inc".into()))
        );
    }

    #[test]
    fn test_bare_word_is_not_a_year() {
        assert_eq!(extract_copyright_info("Copyright SomeWord Else"), None);
        assert_eq!(extract_copyright_info("no copyright here"), None);
    }

    #[test]
    fn test_single_entry() {
        let text = "// SPDX-FileCopyrightText: Copyright (c) 2020 Example Corporation\n\
                    // SPDX-License-Identifier: MIT\n";
        let found = find_spdx_entries(text, Path::new("/p/a.cpp"), DEFAULT_MAX_LOOKAHEAD);
        assert_eq!(
            found,
            vec![CopyrightEntry {
                license_id: "MIT".into(),
                year_range: "2020".into(),
                owner: "Example Corporation".into(),
                file_path: PathBuf::from("/p/a.cpp"),
            }]
        );
    }

    #[test]
    fn test_no_tags() {
        assert!(entries("int main() { return 0; }\n// Copyright (c) 2020 X\n").is_empty());
    }

    #[test]
    fn test_multiple_copyrights_share_license() {
        let text = "/*\n\
                    * SPDX-FileCopyrightText: Copyright (c) 2019 Alpha\n\
                    * SPDX-FileCopyrightText: Copyright (c) 2021 Beta\n\
                    * SPDX-License-Identifier: BSD-3-Clause */\n";
        assert_eq!(
            entries(text),
            vec![
                triple("BSD-3-Clause", "2019", "Alpha"),
                triple("BSD-3-Clause", "2021", "Beta"),
            ]
        );
    }

    #[test]
    fn test_nvidia_entries_are_excluded() {
        let text = "# SPDX-FileCopyrightText: Copyright (c) 2024, NVIDIA CORPORATION.\n\
                    # SPDX-License-Identifier: Apache-2.0\n";
        assert!(entries(text).is_empty());

        let mixed = "# SPDX-FileCopyrightText: Copyright (c) 2018 Other Inc\n\
                     # SPDX-FileCopyrightText: Copyright (c) 2024 nvidia corporation\n\
                     # SPDX-License-Identifier: Apache-2.0\n";
        assert_eq!(entries(mixed), vec![triple("Apache-2.0", "2018", "Other Inc")]);
    }

    #[test]
    fn test_runaway_block_is_abandoned() {
        let mut text = String::from("// SPDX-FileCopyrightText: Copyright (c) 2020 Lost\n");
        for _ in 0..DEFAULT_MAX_LOOKAHEAD + 1 {
            text.push_str("// filler\n");
        }
        text.push_str("// SPDX-License-Identifier: MIT\n");
        assert!(entries(&text).is_empty());
    }

    #[test]
    fn test_lookahead_within_limit() {
        let mut text = String::from("// SPDX-FileCopyrightText: Copyright (c) 2020 Kept\n");
        for _ in 0..DEFAULT_MAX_LOOKAHEAD {
            text.push_str("// filler\n");
        }
        text.push_str("// SPDX-License-Identifier: MIT\n");
        assert_eq!(entries(&text), vec![triple("MIT", "2020", "Kept")]);
    }

    #[test]
    fn test_scanning_resumes_after_abandoned_block() {
        let mut text = String::from("// SPDX-FileCopyrightText: Copyright (c) 2020 Lost\n");
        for _ in 0..=DEFAULT_MAX_LOOKAHEAD {
            text.push_str("\n");
        }
        text.push_str("// SPDX-FileCopyrightText: Copyright (c) 2022 Found\n");
        text.push_str("// SPDX-License-Identifier: Zlib\n");
        assert_eq!(entries(&text), vec![triple("Zlib", "2022", "Found")]);
    }

    #[test]
    fn test_unterminated_block_at_eof() {
        assert!(entries("// SPDX-FileCopyrightText: Copyright (c) 2020 Tail\n").is_empty());
    }

    #[test]
    fn test_unparseable_copyright_line_emits_nothing() {
        let text = "// SPDX-FileCopyrightText: The Foo Project\n\
                    // SPDX-License-Identifier: MIT\n";
        assert!(entries(text).is_empty());
    }

    #[test]
    fn test_scanner_merges_by_basename() {
        let tmp = TempDir::new().unwrap();
        let header = "// SPDX-FileCopyrightText: Copyright (c) 2020 Example Corporation\n\
                      // SPDX-License-Identifier: MIT\n";
        for dir in ["a/cpp/src", "b/cpp/src", "a/cpp/tests"] {
            std::fs::create_dir_all(tmp.path().join(dir)).unwrap();
            std::fs::write(tmp.path().join(dir).join("hash.hpp"), header).unwrap();
        }
        std::fs::write(tmp.path().join("a/cpp/src/blob.bin"), [0xffu8, 0xfe, 0x00]).unwrap();

        let scanner = HeaderScanner::new(
            HEADER_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_MAX_LOOKAHEAD,
        );
        let root = tmp.path().to_path_buf();
        let (map, stats) = scanner.scan_all(&[root.clone(), root]);

        assert_eq!(map.len(), 1);
        let info = &map["hash.hpp"];
        assert_eq!(info.paths.len(), 2);
        assert_eq!(info.licenses.len(), 1);
        assert_eq!(stats.matches, 4);
    }
}
