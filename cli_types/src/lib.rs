use anyhow::{anyhow, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// What to do when a single benchmark file cannot be downloaded or parsed.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileFailurePolicy {
    /// Stop the whole run on the first failing file
    Abort,
    /// Log a warning and continue with the remaining files
    Skip,
}

impl FromStr for FileFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(FileFailurePolicy::Abort),
            "skip" => Ok(FileFailurePolicy::Skip),
            _ => Err(anyhow!(
                "Invalid file failure policy: {}. Valid values are 'abort' or 'skip'",
                s
            )),
        }
    }
}

#[derive(Parser)]
#[command(version, name = "bench-viewer")]
pub struct Cli {
    /// Increase verbosity level (can be specified multiple times.) The first level sets level
    /// "info", second sets level "debug", and third sets level "trace" for the logger.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Create a versionless command for manpage generation
    pub fn command_without_version() -> clap::Command {
        let mut cmd = Self::command();
        cmd = cmd.version(None::<&str>);
        cmd
    }
}

/// Where benchmark result files are fetched from. Every option overrides the
/// corresponding key of the configuration files.
#[derive(Args, Debug, Default)]
pub struct CliSource {
    /// Repository holding the benchmark results, as `owner/name`
    #[arg(short, long, value_parser=parse_repository)]
    pub repository: Option<String>,

    /// Branch (or any git ref) holding the benchmark results
    #[arg(short, long, value_parser=parse_spaceless_string)]
    pub branch: Option<String>,

    /// Operating system label; one directory per label is listed.
    /// Can be given multiple times, replaces the configured labels.
    #[arg(long = "os", value_parser=parse_spaceless_string)]
    pub os_labels: Vec<String>,

    /// Base URL of the GitHub REST API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Only files ending with this suffix are downloaded
    #[arg(long)]
    pub extension: Option<String>,

    /// Behavior when a single result file fails to download or parse
    #[arg(long, value_enum)]
    pub on_file_error: Option<FileFailurePolicy>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all benchmark result files and create a report with one chart per test.
    ///
    /// The output format is inferred from the file extension: `.html` renders
    /// interactive line charts (mean time per commit, one line per operating
    /// system, logarithmic y-axis), `.csv` writes tab-delimited rows and
    /// `.json` writes the chart datasets. `-` writes CSV to stdout.
    Report {
        /// Output file
        #[arg(short, long, default_value = "benchmarks.html")]
        output: PathBuf,

        /// Title of the HTML page
        #[arg(long)]
        title: Option<String>,

        /// CSS file whose content is inlined into the HTML page
        #[arg(long)]
        custom_css: Option<PathBuf>,

        /// HTML template with {{TITLE}}, {{PLOTLY_HEAD}}, {{CHARTS}}, {{CUSTOM_CSS}},
        /// {{TIMESTAMP}} and {{REPOSITORY}} placeholders
        #[arg(long)]
        template: Option<PathBuf>,

        /// Only keep tests whose name matches one of these regular expressions
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        #[command(flatten)]
        source: CliSource,
    },

    /// Show the effective configuration and the configuration files consulted
    Config {
        #[command(flatten)]
        source: CliSource,
    },
}

fn parse_spaceless_string(s: &str) -> Result<String> {
    if s.split_whitespace().count() > 1 {
        Err(anyhow!("invalid string: found space in '{}'", s))
    } else {
        Ok(String::from(s))
    }
}

fn parse_repository(s: &str) -> Result<String> {
    let s = parse_spaceless_string(s)?;
    match s.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(s)
        }
        _ => Err(anyhow!("invalid repository: expected 'owner/name', got '{}'", s)),
    }
}
