//! TOML configuration file loading and final settings resolution
//!
//! Values given on the command line always win over the configuration file;
//! the file only fills in what the command line left unset. Repository lists
//! from both sources are merged.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::validation::{
    parse_comma_separated, validate_positive, validate_repositories, ConfigError, ConfigResult,
};
use crate::provider::github::DEFAULT_API_URL;
use crate::report::aggregator::TOP_CONTRIBUTORS;
use crate::report::sink::{DEFAULT_OUTPUT, STDOUT_OUTPUT};
use crate::scanner::types::{
    PageSizes, ScanOptions, DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_CONCURRENT, DEFAULT_PACING_DELAY,
};

use super::args::Args;

pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Settings the configuration file may not provide
///
/// Logging format and destination are fixed once the logger is installed,
/// which happens before the file is read.
pub const COMMAND_LINE_ONLY_KEYS: [&str; 3] = ["token", "log-format", "log-file"];

/// `<config_dir>/Repoaudit/repoaudit.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Repoaudit").join("repoaudit.toml"))
}

/// Read the configuration file.
///
/// An explicitly given file must exist; the default location is optional.
pub async fn load_config_file(explicit: Option<&Path>) -> ConfigResult<Option<toml::Table>> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::file(path, "file does not exist"));
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    log::debug!("Loading configuration from {}", path.display());
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ConfigError::file(&path, e))?;
    let config = parse_config(&contents).map_err(|e| ConfigError::file(&path, e))?;
    Ok(Some(config))
}

pub fn parse_config(contents: &str) -> Result<toml::Table, toml::de::Error> {
    toml::from_str::<toml::Table>(contents)
}

fn invalid(key: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: key.to_string(),
        message: format!("'{}' must be {}", key, expected),
    }
}

fn string_value(config: &toml::Table, key: &str) -> ConfigResult<Option<String>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| invalid(key, "a string")),
    }
}

fn integer_value(config: &toml::Table, key: &str) -> ConfigResult<Option<u64>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|i| u64::try_from(i).ok())
            .map(Some)
            .ok_or_else(|| invalid(key, "a non-negative integer")),
    }
}

/// Single string or array of strings
fn string_list_value(config: &toml::Table, key: &str) -> ConfigResult<Vec<String>> {
    match config.get(key) {
        None => Ok(Vec::new()),
        Some(toml::Value::String(s)) => Ok(vec![s.clone()]),
        Some(toml::Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(key, "a string or an array of strings"))
            })
            .collect(),
        Some(_) => Err(invalid(key, "a string or an array of strings")),
    }
}

/// Fill unset arguments from a parsed configuration file
///
/// Returns the command-line-only keys the file contained; each is ignored
/// with a warning.
pub fn apply_toml_values(args: &mut Args, config: &toml::Table) -> ConfigResult<Vec<String>> {
    args.repository
        .extend(string_list_value(config, "repository")?);

    if args.organization.is_none() {
        args.organization = string_value(config, "organization")?;
    }
    if args.days.is_none() {
        args.days = integer_value(config, "days")?
            .map(|d| u32::try_from(d).map_err(|_| invalid("days", "a number of days")))
            .transpose()?;
    }
    if args.output.is_none() {
        args.output = string_value(config, "output")?;
    }
    if args.api_url.is_none() {
        args.api_url = string_value(config, "api-url")?;
    }
    if args.max_concurrent.is_none() {
        args.max_concurrent = integer_value(config, "max-concurrent")?.map(|n| n as usize);
    }
    if args.pacing_ms.is_none() {
        args.pacing_ms = integer_value(config, "pacing-ms")?;
    }
    if args.top_contributors.is_none() {
        args.top_contributors = integer_value(config, "top-contributors")?.map(|n| n as usize);
    }
    if args.log_level.is_none() {
        args.log_level = string_value(config, "log-level")?;
    }
    if args.color_override().is_none() {
        match config.get("color") {
            None => {}
            Some(toml::Value::Boolean(true)) => args.color = true,
            Some(toml::Value::Boolean(false)) => args.no_color = true,
            Some(_) => return Err(invalid("color", "true or false")),
        }
    }

    let ignored: Vec<String> = COMMAND_LINE_ONLY_KEYS
        .iter()
        .filter(|key| config.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    for key in &ignored {
        if key == "token" {
            log::warn!("Ignoring 'token' in configuration file; use --token or ${}", TOKEN_ENV_VAR);
        } else {
            log::warn!("Ignoring '{}' in configuration file; use --{}", key, key);
        }
    }
    Ok(ignored)
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub repositories: Vec<String>,
    pub organization: Option<String>,
    pub lookback_days: u32,
    pub output: String,
    pub token: Option<String>,
    pub api_url: String,
    pub max_concurrent: usize,
    pub pacing_delay: Duration,
    pub show_summary: bool,
    pub top_contributors: usize,
    pub log_level: Option<String>,
    pub color: Option<bool>,
    pub verbosity: i8,
}

impl AppConfig {
    /// Apply defaults, the token fallback and validation
    pub fn from_args(args: Args) -> ConfigResult<Self> {
        let repositories = parse_comma_separated(&args.repository);
        validate_repositories(&repositories)?;

        let lookback_days = args.days.unwrap_or(DEFAULT_LOOKBACK_DAYS);
        validate_positive("days", u64::from(lookback_days))?;
        let max_concurrent = args.max_concurrent.unwrap_or(DEFAULT_MAX_CONCURRENT);
        validate_positive("max-concurrent", max_concurrent as u64)?;
        let top_contributors = args.top_contributors.unwrap_or(TOP_CONTRIBUTORS);
        validate_positive("top-contributors", top_contributors as u64)?;

        let output = args.output.clone().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
        if output.trim().is_empty() {
            return Err(invalid("output", "a file path or '-'"));
        }

        let token = args
            .token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .filter(|t| !t.trim().is_empty());

        Ok(Self {
            repositories,
            organization: args.organization.clone().filter(|o| !o.trim().is_empty()),
            lookback_days,
            show_summary: !args.no_summary && output != STDOUT_OUTPUT,
            top_contributors,
            output,
            token,
            api_url: args.api_url.clone().unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            max_concurrent,
            pacing_delay: args
                .pacing_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_PACING_DELAY),
            color: args.color_override(),
            verbosity: args.verbosity(),
            log_level: args.log_level,
        })
    }

    /// Command line, then configuration file, then defaults
    pub async fn load(mut args: Args) -> ConfigResult<Self> {
        if let Some(config) = load_config_file(args.config_file.as_deref()).await? {
            apply_toml_values(&mut args, &config)?;
        }
        Self::from_args(args)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            lookback_days: self.lookback_days,
            page_sizes: PageSizes::default(),
            pacing_delay: self.pacing_delay,
            max_concurrent: self.max_concurrent,
        }
    }

    /// Explicit choice, otherwise color only on a terminal
    pub fn use_color(&self) -> bool {
        self.color.unwrap_or_else(|| std::io::stdout().is_terminal())
    }
}
