//! GitHub REST API client
//!
//! Fetches a single page per call and hands every element of the returned
//! array back as an untyped record. Transient failures are retried according
//! to the configured [`RetryPolicy`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::core::retry::{retry_async, RetryPolicy};
use crate::core::version::user_agent;
use crate::provider::error::{ProviderError, ProviderResult};
use crate::provider::traits::{ProviderClient, RawRecord};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the GitHub REST API
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    retry_policy: RetryPolicy,
}

impl GitHubClient {
    /// Create a client for `base_url`; requests are unauthenticated when no
    /// token is given
    pub fn new(base_url: &str, token: Option<String>) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Network {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        if let Ok(agent) = user_agent().parse() {
            headers.insert(USER_AGENT, agent);
        }
        if let Some(token) = &self.token {
            match format!("token {}", token).parse() {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => log::warn!("Ignoring token containing invalid header characters"),
            }
        }
        headers
    }

    async fn get_once(&self, path: &str, query: &[(&str, String)]) -> ProviderResult<Value> {
        let url = self.endpoint(path);
        log::trace!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Network {
                message: format!("Request to {} failed: {}", url, e),
            })?;

        let status = response.status().as_u16();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let remaining = header("x-ratelimit-remaining");
        let reset = header("x-ratelimit-reset");

        let body = response.text().await.map_err(|e| ProviderError::Network {
            message: format!("Failed to read response body from {}: {}", url, e),
        })?;

        if !(200..300).contains(&status) {
            return Err(error_from_response(
                status,
                remaining.as_deref(),
                reset.as_deref(),
                &body,
            ));
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
            message: format!("{} returned invalid JSON: {}", url, e),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> ProviderResult<Value> {
        retry_async(path, self.retry_policy.clone(), || self.get_once(path, query)).await
    }

    async fn get_records(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<Vec<RawRecord>> {
        let value = self.get_json(path, query).await?;
        into_records(value)
    }
}

/// Classify a non-2xx response
pub(crate) fn error_from_response(
    status: u16,
    rate_limit_remaining: Option<&str>,
    rate_limit_reset: Option<&str>,
    body: &str,
) -> ProviderError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(200).collect());

    let exhausted = rate_limit_remaining.map(str::trim) == Some("0");
    if status == 429 || (status == 403 && exhausted) {
        let message = match rate_limit_reset {
            Some(reset) => format!("{} (resets at epoch {})", message, reset),
            None => message,
        };
        return ProviderError::RateLimited { status, message };
    }

    ProviderError::Http { status, message }
}

/// List endpoints must answer with a JSON array
pub(crate) fn into_records(value: Value) -> ProviderResult<Vec<RawRecord>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(ProviderError::Decode {
            message: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl ProviderClient for GitHubClient {
    async fn fetch_commits(
        &self,
        repository: &str,
        since: &str,
        page_size: u32,
    ) -> ProviderResult<Vec<RawRecord>> {
        let path = format!("repos/{}/commits", repository);
        let query = [("since", since.to_string()), ("per_page", page_size.to_string())];
        self.get_records(&path, &query).await
    }

    async fn fetch_pull_requests(
        &self,
        repository: &str,
        state: &str,
        page_size: u32,
    ) -> ProviderResult<Vec<RawRecord>> {
        let path = format!("repos/{}/pulls", repository);
        let query = [("state", state.to_string()), ("per_page", page_size.to_string())];
        self.get_records(&path, &query).await
    }

    async fn fetch_repo_events(
        &self,
        repository: &str,
        page_size: u32,
    ) -> ProviderResult<Vec<RawRecord>> {
        let path = format!("repos/{}/events", repository);
        self.get_records(&path, &[("per_page", page_size.to_string())])
            .await
    }

    async fn fetch_branches(
        &self,
        repository: &str,
        page_size: u32,
    ) -> ProviderResult<Vec<RawRecord>> {
        let path = format!("repos/{}/branches", repository);
        self.get_records(&path, &[("per_page", page_size.to_string())])
            .await
    }

    async fn fetch_tags(&self, repository: &str, page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        let path = format!("repos/{}/tags", repository);
        self.get_records(&path, &[("per_page", page_size.to_string())])
            .await
    }

    async fn fetch_authenticated_login(&self) -> ProviderResult<String> {
        let user = self.get_json("user", &[]).await?;
        user.get("login")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Decode {
                message: "user response has no 'login'".to_string(),
            })
    }

    async fn fetch_repository_name(&self, repository: &str) -> ProviderResult<Option<String>> {
        let path = format!("repos/{}", repository);
        let value = match self.get_json(&path, &[]).await {
            Ok(value) => value,
            Err(ProviderError::Http { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        full_name(&value).map(Some)
    }
}

fn full_name(repository: &Value) -> ProviderResult<String> {
    repository
        .get("full_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Decode {
            message: "repository response has no 'full_name'".to_string(),
        })
}
