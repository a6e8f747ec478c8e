//! Configuration validation
//!
//! Everything here runs before the first network call, so a bad configuration
//! never produces a partial scan.

use crate::core::error_handling::ContextualError;

/// Configuration error, always user-actionable
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("No repositories configured. Use --repo or the 'repository' config key")]
    NoRepositories,

    #[error("{message}")]
    InvalidRepository { name: String, message: String },

    #[error("{message}")]
    InvalidValue { field: String, message: String },

    #[error("{message}")]
    File { path: String, message: String },
}

const NO_REPOSITORIES_MESSAGE: &str =
    "No repositories configured. Use --repo or the 'repository' config key";

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NoRepositories => Some(NO_REPOSITORIES_MESSAGE),
            ConfigError::InvalidRepository { message, .. }
            | ConfigError::InvalidValue { message, .. }
            | ConfigError::File { message, .. } => Some(message),
        }
    }
}

impl ConfigError {
    /// Error for a configuration file that cannot be read or parsed
    pub fn file(path: &std::path::Path, detail: impl std::fmt::Display) -> Self {
        ConfigError::File {
            path: path.display().to_string(),
            message: format!("Error in configuration file {}: {}", path.display(), detail),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validate a single repository entry (`name` or `owner/name`)
pub fn validate_repository_name(name: &str) -> ConfigResult<()> {
    let invalid = |reason: &str| ConfigError::InvalidRepository {
        name: name.to_string(),
        message: format!("Invalid repository name '{}': {}", name, reason),
    };

    if name.trim().is_empty() {
        return Err(invalid("repository name cannot be blank"));
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid("repository name cannot contain whitespace"));
    }
    let segments: Vec<&str> = name.split('/').collect();
    if segments.len() > 2 {
        return Err(invalid("expected 'name' or 'owner/name'"));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(invalid("owner and name cannot be empty"));
    }
    Ok(())
}

/// Validate the repository list: non-empty, every entry well-formed
pub fn validate_repositories(repositories: &[String]) -> ConfigResult<()> {
    if repositories.is_empty() {
        return Err(ConfigError::NoRepositories);
    }
    repositories
        .iter()
        .try_for_each(|repo| validate_repository_name(repo))
}

/// Validate a strictly positive integer setting
pub fn validate_positive(field: &str, value: u64) -> ConfigResult<()> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("'{}' must be greater than 0", field),
        });
    }
    Ok(())
}

/// Split comma-separated entries, trim them and drop duplicates keeping first occurrence
pub fn parse_comma_separated(values: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for entry in values.iter().flat_map(|v| v.split(',')) {
        let trimmed = entry.trim();
        if !trimmed.is_empty() && !result.iter().any(|r| r == trimmed) {
            result.push(trimmed.to_string());
        }
    }
    result
}
