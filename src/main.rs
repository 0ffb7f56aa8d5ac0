//! `license-builder`: collect third-party license information from source trees
//! into one document.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and validate the roots.
//! 2. Load config ([`config::load_config`]) and apply CLI overrides.
//! 3. Scan SPDX source headers ([`scanner::headers`]) and/or `LICENSE*` files
//!    ([`scanner::license_files`]).
//! 4. Reduce LICENSE groups ([`dedup::deduplicate`]).
//! 5. Optionally resolve canonical license texts ([`license`], [`registry`]).
//! 6. Assemble and render the report ([`report`]) to stdout or `--output`.
//! 7. Print the run summary to stderr unless `--quiet`.

mod attribution;
mod cli;
mod config;
mod dedup;
mod license;
mod models;
mod registry;
mod report;
mod scanner;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use cli::{Cli, Command, OutputFormat};
use config::{load_config, Config, LicensesConfig};
use dedup::{deduplicate, DedupOptions};
use license::cache::DirCache;
use license::provider::LicenseTextProvider;
use report::terminal::Summary;
use report::{Report, ReportInput};
use scanner::headers::HeaderScanner;
use scanner::license_files::LicenseFileScanner;
use scanner::{ScanStats, Scanner};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What a subcommand asks for, after config and flags are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Plan {
    headers: bool,
    /// Walk only each root's language source subdirectories.
    source_subdirs_only: bool,
    /// `Some` when LICENSE files are collected, with the passes to run over them.
    license_files: Option<DedupOptions>,
    license_texts: bool,
}

impl Plan {
    fn new(command: &Command, config: &Config) -> Self {
        match command {
            Command::Extract { with_licenses, .. } => Plan {
                headers: true,
                source_subdirs_only: true,
                license_files: None,
                license_texts: *with_licenses,
            },
            Command::Copy { .. } => Plan {
                headers: false,
                source_subdirs_only: false,
                license_files: Some(config.dedup.to_options()),
                license_texts: false,
            },
            Command::All { no_licenses, .. } => Plan {
                headers: true,
                source_subdirs_only: false,
                license_files: Some(config.dedup.to_options()),
                license_texts: !*no_licenses,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let target = cli.command.target();
    let roots = validate_roots(&target.paths)?;

    let mut config = load_config(roots.first().map(PathBuf::as_path), cli.config.as_deref())?;
    apply_overrides(&cli, &mut config);
    let plan = Plan::new(&cli.command, &config);

    let mut summary = Summary {
        roots: roots.len(),
        dedup: plan.license_files,
        ..Summary::default()
    };

    let headers = if plan.headers {
        let (scan_roots, exclude_dirs) = if plan.source_subdirs_only {
            (
                source_roots(&roots, &config.scan.extract_subdirs),
                config.scan.extract_exclude_dirs.clone(),
            )
        } else {
            (roots.clone(), config.scan.header_exclude_dirs.clone())
        };
        let scanner = HeaderScanner::new(exclude_dirs, config.scan.max_header_lookahead);
        let (map, stats) = run_scan(&scanner, &scan_roots, "source headers", cli.quiet)?;
        summary.source_files_scanned = Some(stats.files);
        summary.header_entries = Some(stats.matches);
        summary.files_with_headers = Some(map.len());
        Some(map)
    } else {
        None
    };

    let license_groups = match plan.license_files {
        Some(options) => {
            let scanner = LicenseFileScanner::new(config.scan.license_exclude_dirs.clone());
            let (catalog, _) = run_scan(&scanner, &roots, "LICENSE files", cli.quiet)?;
            if catalog.is_empty() {
                info!("No LICENSE files under {} root(s)", roots.len());
            }
            summary.license_files_found =
                Some(catalog.groups().iter().map(|g| g.paths.len()).sum());
            summary.unique_license_contents = Some(catalog.len());

            let groups = deduplicate(catalog.into_groups(), &options);
            summary.license_groups_reported = Some(groups.len());
            Some(groups)
        }
        None => None,
    };

    let provider = if plan.license_texts {
        Some(build_provider(&config.licenses)?)
    } else {
        None
    };

    let pb = match &provider {
        Some(_) if headers.is_some() => spinner(cli.quiet, "Resolving license texts")?,
        _ => None,
    };
    let report = report::assemble(
        ReportInput {
            headers: headers.as_ref(),
            license_groups: license_groups.as_deref(),
        },
        provider.as_ref(),
    )
    .await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    summary.license_texts_missing = report
        .license_texts
        .as_ref()
        .map(|texts| texts.iter().filter(|t| t.text.is_none()).count());

    write_report(&report, cli.format, target.output.as_deref())?;

    if !cli.quiet {
        if let Some(path) = &target.output {
            eprintln!("  {} wrote {}", "→".cyan(), path.display());
        }
        report::terminal::render(&summary);
    }

    Ok(())
}

/// Every path must be an existing directory. Returns canonical paths in input order.
fn validate_roots(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.exists() {
            bail!("Path does not exist: {}", path.display());
        }
        if !path.is_dir() {
            bail!("Not a directory: {}", path.display());
        }
        roots.push(
            path.canonicalize()
                .with_context(|| format!("resolve {}", path.display()))?,
        );
    }
    Ok(roots)
}

/// `<root>/<subdir>` for every root and subdir that exists, in order.
fn source_roots(roots: &[PathBuf], subdirs: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for root in roots {
        for subdir in subdirs {
            let dir = root.join(subdir);
            if dir.is_dir() {
                found.push(dir);
            } else {
                warn!("Directory {} does not exist", dir.display());
            }
        }
    }
    found
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    if cli.offline {
        config.licenses.offline = true;
    }
    if let Some(dir) = &cli.cache_dir {
        config.licenses.cache_dir = Some(dir.clone());
    }
    match &cli.command {
        Command::Copy { dedup, .. } | Command::All { dedup, .. } => dedup.apply(&mut config.dedup),
        Command::Extract { .. } => {}
    }
}

fn spinner(quiet: bool, message: &str) -> Result<Option<ProgressBar>> {
    if quiet {
        return Ok(None);
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(Some(pb))
}

fn run_scan<S: Scanner>(
    scanner: &S,
    roots: &[PathBuf],
    label: &str,
    quiet: bool,
) -> Result<(S::Output, ScanStats)> {
    let pb = spinner(quiet, &format!("Scanning {}", label))?;
    let (output, stats) = scanner.scan_all(roots);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if !quiet {
        eprintln!(
            "  {} {}: {} files read, {} recorded",
            "→".cyan(),
            label,
            stats.files,
            stats.matches
        );
    }
    Ok((output, stats))
}

fn build_provider(config: &LicensesConfig) -> Result<LicenseTextProvider<DirCache>> {
    let cache = DirCache::new(config.resolved_cache_dir());
    info!("License text cache: {}", cache.base().display());

    if config.offline {
        return Ok(LicenseTextProvider::offline(cache));
    }

    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    Ok(LicenseTextProvider::online(cache, client, config.spdx_url.clone()))
}

fn render(report: &Report, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => report::text::render(report, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_report(report: &Report, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            render(report, format, &mut out)?;
            out.flush()?;
        }
        None => {
            let mut out = io::stdout().lock();
            render(report, format, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}
