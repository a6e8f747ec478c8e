//! Retry utility for handling transient errors in async operations
//!
//! Only errors that report themselves as transient are retried; everything
//! else is returned on the first failure.

use std::time::Duration;
use tokio::time::sleep;

/// Errors that can tell whether repeating the operation may succeed
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Configurable retry policy for async operations
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Execute an async operation, retrying while it fails with a transient error
///
/// # Examples
/// ```rust
/// use repoaudit::core::retry::{retry_async, RetryPolicy, Transient};
///
/// struct Flaky;
/// impl std::fmt::Display for Flaky {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "flaky") }
/// }
/// impl Transient for Flaky {
///     fn is_transient(&self) -> bool { true }
/// }
///
/// # async fn example() -> Result<u32, Flaky> {
/// let value = retry_async("fetch_branches", RetryPolicy::default(), || async {
///     Ok::<u32, Flaky>(7)
/// })
/// .await?;
/// # Ok(value)
/// # }
/// ```
pub async fn retry_async<F, T, E, Fut>(
    operation_name: &str,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display + Transient,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) if attempt < max_attempts && error.is_transient() => {
                log::debug!(
                    "Operation '{}' failed on attempt {}/{}, retrying in {:?}: {}",
                    operation_name,
                    attempt,
                    max_attempts,
                    policy.delay,
                    error
                );
                sleep(policy.delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
