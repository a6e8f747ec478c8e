//! Generic error handling utilities
//!
//! Provides unified fatal-error logging that works across the domain error
//! types while keeping the user-facing line short.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)` with a helpful, actionable message. When it returns `false`,
/// `user_message()` returns `None` and the caller falls back to a generic context.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on directly
    ///
    /// Examples: invalid configuration values, an unwritable output path.
    /// Counter-examples: network failures, serialization bugs.
    fn is_user_actionable(&self) -> bool;

    /// The specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors show their own message; system errors show the
/// operation context. Full detail is always available at debug level.
///
/// # Examples
/// ```rust,no_run
/// # use repoaudit::core::error_handling::log_error_with_context;
/// # use repoaudit::core::validation::ConfigError;
/// let err = ConfigError::NoRepositories;
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "FATAL: No repositories configured. Use --repo or the 'repository' config key"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {}: {}", operation_context, error),
    }
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
