//! Test helpers for scanner unit tests
//!
//! A scripted in-memory provider that records every call it receives and
//! tracks how many calls were in flight at once.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::compliance::RecordKind;
use crate::provider::{ProviderClient, ProviderError, ProviderResult, RawRecord, RepositoryResolver};

/// One provider call as observed by [`ScriptedClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub repository: String,
    pub kind: RecordKind,
    pub page_size: u32,
    /// `since` for commits, `state` for pull requests
    pub argument: Option<String>,
}

#[derive(Default)]
pub struct ScriptedClient {
    responses: HashMap<(String, RecordKind), ProviderResult<Vec<Value>>>,
    missing: HashSet<String>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    latency: Duration,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn respond(mut self, repository: &str, kind: RecordKind, records: Vec<Value>) -> Self {
        self.responses
            .insert((repository.to_string(), kind), Ok(records));
        self
    }

    pub fn fail(mut self, repository: &str, kind: RecordKind, error: ProviderError) -> Self {
        self.responses
            .insert((repository.to_string(), kind), Err(error));
        self
    }

    /// Report `repository` as nonexistent
    pub fn without(mut self, repository: &str) -> Self {
        self.missing.insert(repository.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn answer(
        &self,
        repository: &str,
        kind: RecordKind,
        page_size: u32,
        argument: Option<&str>,
    ) -> ProviderResult<Vec<RawRecord>> {
        self.calls.lock().unwrap().push(RecordedCall {
            repository: repository.to_string(),
            kind,
            page_size,
            argument: argument.map(str::to_string),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.responses
            .get(&(repository.to_string(), kind))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl ProviderClient for ScriptedClient {
    async fn fetch_commits(&self, repository: &str, since: &str, page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.answer(repository, RecordKind::Commits, page_size, Some(since)).await
    }

    async fn fetch_pull_requests(&self, repository: &str, state: &str, page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.answer(repository, RecordKind::PullRequests, page_size, Some(state)).await
    }

    async fn fetch_repo_events(&self, repository: &str, page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.answer(repository, RecordKind::RepositoryEvents, page_size, None).await
    }

    async fn fetch_branches(&self, repository: &str, page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.answer(repository, RecordKind::Branches, page_size, None).await
    }

    async fn fetch_tags(&self, repository: &str, page_size: u32) -> ProviderResult<Vec<RawRecord>> {
        self.answer(repository, RecordKind::Tags, page_size, None).await
    }

    async fn fetch_authenticated_login(&self) -> ProviderResult<String> {
        Ok("octo".to_string())
    }

    async fn fetch_repository_name(&self, repository: &str) -> ProviderResult<Option<String>> {
        Ok((!self.missing.contains(repository)).then(|| repository.to_string()))
    }
}

/// Qualifies short names with a fixed owner and checks them against the client
pub struct FixedOwnerResolver {
    pub owner: &'static str,
    pub client: std::sync::Arc<ScriptedClient>,
}

#[async_trait]
impl RepositoryResolver for FixedOwnerResolver {
    async fn resolve(&self, name: &str) -> Option<String> {
        let qualified = if name.contains('/') {
            name.to_string()
        } else {
            format!("{}/{}", self.owner, name)
        };
        self.client.fetch_repository_name(&qualified).await.ok().flatten()
    }
}

pub fn commit_record(sha: &str, message: &str, date: &str) -> Value {
    json!({
        "sha": sha,
        "commit": {
            "message": message,
            "author": {"name": "Ada"},
            "committer": {"date": date}
        },
        "files": [{"additions": 3, "deletions": 1}]
    })
}

pub fn pull_request_record(number: u64, body: Option<&str>, review_comments: u64) -> Value {
    json!({
        "number": number,
        "title": format!("Change {}", number),
        "state": "closed",
        "created_at": "2024-05-20T09:00:00Z",
        "user": {"login": "octo"},
        "body": body,
        "review_comments": review_comments,
        "additions": 10,
        "deletions": 2
    })
}

pub fn repo_event_record(id: &str, event_type: &str) -> Value {
    json!({
        "id": id,
        "type": event_type,
        "created_at": "2024-05-21T09:00:00Z",
        "actor": {"login": "octo"},
        "payload": {"ref": "main", "ref_type": "branch", "commits": [{}]}
    })
}

pub fn branch_record(name: &str, protected: bool) -> Value {
    json!({"name": name, "commit": {"sha": "b1"}, "protected": protected})
}

pub fn tag_record(name: &str) -> Value {
    json!({"name": name, "commit": {"sha": "t1"}})
}
