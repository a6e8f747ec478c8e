//! Provider boundary traits
//!
//! The scanner only talks to a source-control provider through
//! [`ProviderClient`], which keeps collection testable without a network.

use async_trait::async_trait;

use crate::provider::error::ProviderResult;

/// Untyped record as returned by the provider
pub type RawRecord = serde_json::Value;

/// Read access to one source-control provider
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Commits made since the given ISO 8601 instant
    async fn fetch_commits(
        &self,
        repository: &str,
        since: &str,
        page_size: u32,
    ) -> ProviderResult<Vec<RawRecord>>;

    /// Pull requests in the given state (`open`, `closed` or `all`)
    async fn fetch_pull_requests(
        &self,
        repository: &str,
        state: &str,
        page_size: u32,
    ) -> ProviderResult<Vec<RawRecord>>;

    /// Recent repository activity events of every type
    async fn fetch_repo_events(
        &self,
        repository: &str,
        page_size: u32,
    ) -> ProviderResult<Vec<RawRecord>>;

    async fn fetch_branches(&self, repository: &str, page_size: u32)
        -> ProviderResult<Vec<RawRecord>>;

    async fn fetch_tags(&self, repository: &str, page_size: u32) -> ProviderResult<Vec<RawRecord>>;

    /// Login of the account the client is authenticated as
    async fn fetch_authenticated_login(&self) -> ProviderResult<String>;

    /// Canonical `owner/name` of a repository, `None` when it does not exist
    async fn fetch_repository_name(&self, repository: &str) -> ProviderResult<Option<String>>;
}

/// Maps configured repository names to fully-qualified `owner/name` identifiers
#[async_trait]
pub trait RepositoryResolver: Send + Sync {
    /// `None` when the repository is known not to exist; a name whose owner
    /// cannot be determined is returned unchanged
    async fn resolve(&self, name: &str) -> Option<String>;
}
