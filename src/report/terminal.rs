use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::dedup::DedupOptions;

/// Counters collected over one run, printed to stderr when not quiet.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub roots: usize,
    pub source_files_scanned: Option<usize>,
    pub header_entries: Option<usize>,
    pub files_with_headers: Option<usize>,
    pub license_files_found: Option<usize>,
    pub unique_license_contents: Option<usize>,
    pub license_groups_reported: Option<usize>,
    pub license_texts_missing: Option<usize>,
    pub dedup: Option<DedupOptions>,
}

fn on_off(enabled: bool) -> ColoredString {
    if enabled {
        "on".green()
    } else {
        "off".dimmed()
    }
}

/// Render the run summary table.
pub fn render(summary: &Summary) {
    eprintln!();
    eprintln!(
        " {} v{}",
        "license-builder".bold(),
        env!("CARGO_PKG_VERSION")
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Summary").add_attribute(Attribute::Bold),
            Cell::new("Count").add_attribute(Attribute::Bold),
        ]);

    let mut row = |label: &str, value: Option<usize>, color: Color| {
        if let Some(value) = value {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(value)
                    .fg(color)
                    .set_alignment(CellAlignment::Right),
            ]);
        }
    };

    row("Project roots", Some(summary.roots), Color::Reset);
    row("Source files scanned", summary.source_files_scanned, Color::Reset);
    row("Third-party header entries", summary.header_entries, Color::Cyan);
    row("Files with third-party headers", summary.files_with_headers, Color::Cyan);
    row("LICENSE files found", summary.license_files_found, Color::Reset);
    row("Unique LICENSE contents", summary.unique_license_contents, Color::Cyan);
    row("LICENSE groups reported", summary.license_groups_reported, Color::Green);
    row("License texts unavailable", summary.license_texts_missing, Color::Yellow);

    eprintln!("{}", table);

    if let Some(dedup) = summary.dedup {
        eprintln!(
            " Deduplication: CCCL {}  RAPIDS {}  Years {}",
            on_off(dedup.handle_cccl),
            on_off(dedup.deduplicate_rapids),
            on_off(dedup.normalize_years)
        );
    }
    if summary.license_texts_missing.unwrap_or(0) > 0 {
        eprintln!(
            " {} some license texts could not be resolved; run online or populate the cache",
            "⚠".yellow()
        );
    }
    eprintln!();
}
