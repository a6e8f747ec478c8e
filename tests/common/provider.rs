//! In-memory provider client for integration tests

use async_trait::async_trait;
use repoaudit::provider::{ProviderClient, ProviderError, ProviderResult, RawRecord};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Commits,
    Pulls,
    Events,
    Branches,
    Tags,
}

#[derive(Default)]
pub struct ScriptedProvider {
    responses: HashMap<(String, Endpoint), ProviderResult<Vec<Value>>>,
    login: Option<String>,
    missing: HashSet<String>,
    requests: Mutex<Vec<(String, Endpoint)>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login(mut self, login: &str) -> Self {
        self.login = Some(login.to_string());
        self
    }

    pub fn with(mut self, repository: &str, endpoint: Endpoint, records: Vec<Value>) -> Self {
        self.responses
            .insert((repository.to_string(), endpoint), Ok(records));
        self
    }

    pub fn without(mut self, repository: &str) -> Self {
        self.missing.insert(repository.to_string());
        self
    }

    pub fn failing(mut self, repository: &str, endpoint: Endpoint, status: u16) -> Self {
        let error = ProviderError::Http {
            status,
            message: format!("scripted failure {}", status),
        };
        self.responses
            .insert((repository.to_string(), endpoint), Err(error));
        self
    }

    pub fn requested_repositories(&self) -> Vec<String> {
        let mut repositories: Vec<String> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|(repo, _)| repo.clone())
            .collect();
        repositories.sort();
        repositories.dedup();
        repositories
    }

    fn reply(&self, repository: &str, endpoint: Endpoint) -> ProviderResult<Vec<RawRecord>> {
        self.requests
            .lock()
            .unwrap()
            .push((repository.to_string(), endpoint));
        self.responses
            .get(&(repository.to_string(), endpoint))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn fetch_commits(&self, repository: &str, _since: &str, _page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.reply(repository, Endpoint::Commits)
    }

    async fn fetch_pull_requests(&self, repository: &str, _state: &str, _page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.reply(repository, Endpoint::Pulls)
    }

    async fn fetch_repo_events(&self, repository: &str, _page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.reply(repository, Endpoint::Events)
    }

    async fn fetch_branches(&self, repository: &str, _page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.reply(repository, Endpoint::Branches)
    }

    async fn fetch_tags(&self, repository: &str, _page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.reply(repository, Endpoint::Tags)
    }

    async fn fetch_authenticated_login(&self) -> ProviderResult<String> {
        self.login.clone().ok_or(ProviderError::Http {
            status: 401,
            message: "Requires authentication".to_string(),
        })
    }

    async fn fetch_repository_name(&self, repository: &str) -> ProviderResult<Option<String>> {
        if self.missing.contains(repository) {
            Ok(None)
        } else {
            Ok(Some(repository.to_string()))
        }
    }
}
