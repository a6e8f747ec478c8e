//! Command line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "repoaudit")]
#[command(about = "Repository compliance auditing tool")]
#[command(version)]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Repositories to audit* (name or owner/name)
    #[arg(short = 'r', long = "repo", value_name = "REPOS", action = ArgAction::Append)]
    pub repository: Vec<String>,

    /// Organization used to qualify short repository names
    #[arg(long = "org", value_name = "ORG")]
    pub organization: Option<String>,

    /// Commit lookback window in days [default: 30]
    #[arg(short = 'd', long = "days", value_name = "DAYS")]
    pub days: Option<u32>,

    /// Report file, '-' for stdout [default: compliance_report.json]
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// API token (defaults to $GITHUB_TOKEN)
    #[arg(long = "token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// API base URL [default: https://api.github.com]
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Repositories scanned at the same time [default: 4]
    #[arg(long = "max-concurrent", value_name = "COUNT")]
    pub max_concurrent: Option<usize>,

    /// Pause after each repository in milliseconds [default: 1000]
    #[arg(long = "pacing-ms", value_name = "MILLIS")]
    pub pacing_ms: Option<u64>,

    /// Contributors listed in the report summary [default: 10]
    #[arg(long = "top-contributors", value_name = "COUNT")]
    pub top_contributors: Option<usize>,

    /// Do not print the console summary
    #[arg(long = "no-summary")]
    pub no_summary: bool,

    /// Log level
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<String>,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,
}

impl Args {
    /// Explicit color choice: `Some(true)` for --color, `Some(false)` for
    /// --no-color, `None` to decide from the terminal
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Net `-v`/`-q` adjustment
    pub fn verbosity(&self) -> i8 {
        let delta = i16::from(self.verbose) - i16::from(self.quiet);
        delta.clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8
    }
}
