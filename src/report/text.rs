use std::io::Write;

use anyhow::Result;

use super::{LicenseFileSection, LicenseTextSection, Location, Report, SourceFileSection};

const WIDTH: usize = 80;

fn rule(out: &mut impl Write, c: char) -> Result<()> {
    writeln!(out, "{}", c.to_string().repeat(WIDTH))?;
    Ok(())
}

fn banner(out: &mut impl Write, c: char, title: &str) -> Result<()> {
    rule(out, c)?;
    writeln!(out, "{}", title)?;
    rule(out, c)?;
    writeln!(out)?;
    Ok(())
}

fn write_locations(out: &mut impl Write, locations: &[Location]) -> Result<()> {
    writeln!(out, "  Locations:")?;
    for loc in locations {
        writeln!(out, "    {}: {}", loc.project, loc.relative_path)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_source_file(out: &mut impl Write, section: &SourceFileSection) -> Result<()> {
    banner(out, '-', &format!("File: {}", section.filename))?;
    write_locations(out, &section.locations)?;

    for license in &section.licenses {
        writeln!(out, "  License: {}", license.license_id)?;
        writeln!(out)?;
        for c in &license.copyrights {
            if c.year_range.is_empty() {
                writeln!(out, "    Copyright (c) {}", c.owner)?;
            } else {
                writeln!(out, "    Copyright (c) {}, {}", c.year_range, c.owner)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_license_text(out: &mut impl Write, section: &LicenseTextSection) -> Result<()> {
    banner(out, '-', &format!("License: {}", section.license_id))?;
    match &section.text {
        Some(text) => {
            for line in text.lines() {
                writeln!(out, "{}", line)?;
            }
        }
        None => writeln!(out, "License text for {} not available.", section.license_id)?,
    }
    writeln!(out)?;
    writeln!(out)?;
    Ok(())
}

fn write_license_file(out: &mut impl Write, section: &LicenseFileSection) -> Result<()> {
    rule(out, '-')?;
    write_locations(out, &section.locations)?;

    if section.text.is_empty() {
        writeln!(out, "  (License text could not be read)")?;
    } else {
        writeln!(out, "  License Text:")?;
        writeln!(out)?;
        for line in section.text.lines() {
            writeln!(out, "    {}", line)?;
        }
    }
    writeln!(out)?;

    rule(out, '-')?;
    writeln!(out)?;
    Ok(())
}

/// Write the full license document.
pub fn render(report: &Report, out: &mut impl Write) -> Result<()> {
    banner(out, '=', "THIRD-PARTY SOFTWARE LICENSES")?;
    writeln!(
        out,
        "This file contains license information for third-party software used in this project."
    )?;
    writeln!(out)?;

    if let Some(files) = report.source_files.as_ref().filter(|f| !f.is_empty()) {
        banner(out, '=', "SECTION 1: Third-Party Code in Source Files (SPDX Entries)")?;
        writeln!(
            out,
            "The following files contain third-party code with SPDX copyright headers."
        )?;
        writeln!(out)?;
        for section in files {
            write_source_file(out, section)?;
        }

        if let Some(texts) = report.license_texts.as_ref().filter(|t| !t.is_empty()) {
            banner(out, '=', "Full License Texts for SPDX Entries")?;
            for section in texts {
                write_license_text(out, section)?;
            }
        }
    }

    if let Some(files) = report.license_files.as_ref().filter(|f| !f.is_empty()) {
        banner(out, '=', "SECTION 2: Dependency LICENSE Files")?;
        writeln!(
            out,
            "The following LICENSE files were found in dependency directories."
        )?;
        writeln!(out)?;
        for section in files {
            write_license_file(out, section)?;
        }
    }

    if report.is_empty() {
        writeln!(out, "No third-party licenses found.")?;
        writeln!(out)?;
    }

    Ok(())
}
