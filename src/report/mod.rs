//! Report assembly and rendering.
//!
//! [`assemble`] turns scan output into a [`Report`] whose every list is sorted,
//! so identical input always renders identically.
//!
//! - [`text`]: the plain-text license document.
//! - [`terminal`]: colored run summary on stderr.

pub mod terminal;
pub mod text;

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::attribution::project_relative_path;
use crate::dedup::ecosystem;
use crate::license::cache::LicenseCache;
use crate::license::provider::LicenseTextProvider;
use crate::license::spdx::license_components;
use crate::models::{Ecosystem, LicenseGroup};
use crate::scanner::headers::HeaderMap;

const UNKNOWN_PROJECT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub project: String,
    pub relative_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<Ecosystem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Copyright {
    pub year_range: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseCopyrights {
    pub license_id: String,
    pub copyrights: Vec<Copyright>,
}

/// All header-derived licensing for one source file basename.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFileSection {
    pub filename: String,
    pub locations: Vec<Location>,
    pub licenses: Vec<LicenseCopyrights>,
}

/// Canonical text for one license identifier seen in source headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseTextSection {
    pub license_id: String,
    pub text: Option<String>,
}

/// One deduplicated LICENSE group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseFileSection {
    pub filenames: Vec<String>,
    pub locations: Vec<Location>,
    pub text: String,
}

/// `None` sections were not requested; `Some(vec![])` means requested but nothing found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_files: Option<Vec<SourceFileSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_texts: Option<Vec<LicenseTextSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_files: Option<Vec<LicenseFileSection>>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.source_files.as_ref().map_or(true, Vec::is_empty)
            && self.license_files.as_ref().map_or(true, Vec::is_empty)
    }
}

/// Scan output handed to [`assemble`].
#[derive(Debug, Default)]
pub struct ReportInput<'a> {
    pub headers: Option<&'a HeaderMap>,
    pub license_groups: Option<&'a [LicenseGroup]>,
}

fn location(path: &Path, relative_path: Option<&str>) -> Location {
    let attribution = project_relative_path(path);
    Location {
        project: attribution
            .project_name
            .unwrap_or_else(|| UNKNOWN_PROJECT.to_string()),
        relative_path: relative_path
            .map(str::to_string)
            .unwrap_or(attribution.relative_path),
        ecosystem: ecosystem::classify(path),
    }
}

fn sorted_locations(locations: impl Iterator<Item = Location>) -> Vec<Location> {
    locations.collect::<BTreeSet<_>>().into_iter().collect()
}

pub fn source_file_sections(headers: &HeaderMap) -> Vec<SourceFileSection> {
    headers
        .iter()
        .map(|(filename, info)| {
            let mut licenses: Vec<LicenseCopyrights> = Vec::new();
            // (license, years, owner) tuples arrive sorted, so each license's run is contiguous.
            for (license_id, year_range, owner) in &info.licenses {
                let copyright = Copyright {
                    year_range: year_range.clone(),
                    owner: owner.clone(),
                };
                match licenses.last_mut() {
                    Some(last) if &last.license_id == license_id => last.copyrights.push(copyright),
                    _ => licenses.push(LicenseCopyrights {
                        license_id: license_id.clone(),
                        copyrights: vec![copyright],
                    }),
                }
            }

            SourceFileSection {
                filename: filename.clone(),
                locations: sorted_locations(info.paths.iter().map(|p| location(p, None))),
                licenses,
            }
        })
        .collect()
}

pub fn license_file_sections(groups: &[LicenseGroup]) -> Vec<LicenseFileSection> {
    let mut keyed: Vec<(String, LicenseFileSection)> = groups
        .iter()
        .map(|group| {
            let section = LicenseFileSection {
                filenames: group.filenames.iter().cloned().collect(),
                locations: sorted_locations(
                    group
                        .paths
                        .iter()
                        .map(|(abs, rel)| location(abs, Some(rel.as_str()))),
                ),
                text: group.content.clone(),
            };
            (group.key.clone(), section)
        })
        .collect();

    keyed.sort_by(|(ka, a), (kb, b)| {
        a.filenames
            .first()
            .cmp(&b.filenames.first())
            .then_with(|| a.locations.first().cmp(&b.locations.first()))
            .then_with(|| ka.cmp(kb))
    });

    keyed.into_iter().map(|(_, section)| section).collect()
}

/// Individual license identifiers used in headers, compound expressions split,
/// in sorted expression order without repeats.
pub fn license_ids(headers: &HeaderMap) -> Vec<String> {
    let expressions: BTreeSet<&str> = headers
        .values()
        .flat_map(|info| info.licenses.iter().map(|(id, _, _)| id.as_str()))
        .collect();

    let mut ids: Vec<String> = Vec::new();
    for expr in expressions {
        for component in license_components(expr) {
            if !ids.contains(&component) {
                ids.push(component);
            }
        }
    }
    ids
}

/// Build the report. With a provider, canonical texts are requested for every
/// license identifier found in headers; lookups that fail become `text: None`.
pub async fn assemble<C: LicenseCache>(
    input: ReportInput<'_>,
    provider: Option<&LicenseTextProvider<C>>,
) -> Report {
    let license_texts = match (input.headers, provider) {
        (Some(headers), Some(provider)) => Some(
            provider
                .resolve_all(license_ids(headers))
                .await
                .into_iter()
                .map(|(license_id, text)| LicenseTextSection { license_id, text })
                .collect(),
        ),
        _ => None,
    };

    Report {
        source_files: input.headers.map(source_file_sections),
        license_texts,
        license_files: input.license_groups.map(license_file_sections),
    }
}
