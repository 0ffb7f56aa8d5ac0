use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DedupConfig;

#[derive(Parser, Debug)]
#[command(
    name = "license-builder",
    about = "Collect third-party license information from source trees",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file [default: <first path>/.license-builder/config.toml, fallback ~/.config/license-builder/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Suppress progress and the run summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Resolve license texts from the local cache only
    #[arg(long, global = true)]
    pub offline: bool,

    /// License text cache directory
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract SPDX copyright headers from source files
    Extract {
        #[command(flatten)]
        target: Target,

        /// Append the full text of every license found
        #[arg(long)]
        with_licenses: bool,
    },
    /// Collect and deduplicate LICENSE files
    Copy {
        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        dedup: DedupArgs,
    },
    /// Header extraction and LICENSE collection in one document
    All {
        #[command(flatten)]
        target: Target,

        /// Skip fetching full license texts for header entries
        #[arg(long)]
        no_licenses: bool,

        #[command(flatten)]
        dedup: DedupArgs,
    },
}

impl Command {
    pub fn target(&self) -> &Target {
        match self {
            Command::Extract { target, .. }
            | Command::Copy { target, .. }
            | Command::All { target, .. } => target,
        }
    }
}

#[derive(Args, Debug)]
pub struct Target {
    /// Directories to scan
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Switches that turn off individual LICENSE deduplication passes.
#[derive(Args, Debug, Default)]
pub struct DedupArgs {
    /// Keep groups that differ only in copyright years apart
    #[arg(long)]
    pub no_normalize_years: bool,

    /// Keep each RAPIDS project's Apache license separate
    #[arg(long)]
    pub no_deduplicate_rapids: bool,

    /// Report CCCL component licenses alongside the CCCL root
    #[arg(long)]
    pub no_handle_cccl: bool,
}

impl DedupArgs {
    /// Flags only ever disable passes the config enabled.
    pub fn apply(&self, config: &mut DedupConfig) {
        if self.no_normalize_years {
            config.normalize_years = false;
        }
        if self.no_deduplicate_rapids {
            config.deduplicate_rapids = false;
        }
        if self.no_handle_cccl {
            config.handle_cccl = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_copy_with_flags() {
        let cli = Cli::try_parse_from([
            "license-builder",
            "copy",
            "/a",
            "/b",
            "--no-handle-cccl",
            "-o",
            "out.txt",
        ])
        .unwrap();
        let Command::Copy { target, dedup } = &cli.command else {
            panic!("expected copy");
        };
        assert_eq!(target.paths, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(target.output, Some(PathBuf::from("out.txt")));
        assert!(dedup.no_handle_cccl);
        assert!(!dedup.no_normalize_years);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "license-builder",
            "extract",
            "src",
            "--with-licenses",
            "--offline",
            "--format",
            "json",
            "-q",
        ])
        .unwrap();
        assert!(cli.offline);
        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Extract { with_licenses: true, .. }));
    }

    #[test]
    fn test_paths_required() {
        assert!(Cli::try_parse_from(["license-builder", "all"]).is_err());
    }

    #[test]
    fn test_dedup_args_override_config() {
        let mut config = DedupConfig::default();
        DedupArgs {
            no_deduplicate_rapids: true,
            ..DedupArgs::default()
        }
        .apply(&mut config);
        assert!(!config.deduplicate_rapids);
        assert!(config.normalize_years);
        assert!(config.handle_cccl);
    }
}
