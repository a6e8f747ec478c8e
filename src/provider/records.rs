//! Typed views of raw provider records
//!
//! The provider hands records over as untyped JSON. Each record is decoded into
//! one of these views on its own, so a record lacking a required field is
//! rejected without affecting its neighbours. Optional fields tolerate both
//! absence and `null`.

use serde::Deserialize;
use std::fmt;

/// Login-bearing actor (`user`, `actor`)
#[derive(Debug, Clone, Deserialize)]
pub struct RawActor {
    pub login: String,
}

/// Commit as returned by the list-commits endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub commit: RawCommitData,
    #[serde(default)]
    files: Option<Vec<RawCommitFile>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitData {
    pub message: String,
    pub author: RawCommitAuthor,
    pub committer: RawCommitCommitter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitAuthor {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitCommitter {
    pub date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommitFile {
    #[serde(default)]
    pub additions: Option<u64>,
    #[serde(default)]
    pub deletions: Option<u64>,
}

impl RawCommit {
    /// Changed files, empty when the listing did not include them
    pub fn files(&self) -> &[RawCommitFile] {
        self.files.as_deref().unwrap_or_default()
    }

    pub fn total_additions(&self) -> u64 {
        self.files()
            .iter()
            .filter_map(|f| f.additions)
            .fold(0, u64::saturating_add)
    }

    pub fn total_deletions(&self) -> u64 {
        self.files()
            .iter()
            .filter_map(|f| f.deletions)
            .fold(0, u64::saturating_add)
    }
}

/// Pull request as returned by the list-pulls endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RawPullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: String,
    pub user: RawActor,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    merged: Option<bool>,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    review_comments: Option<u64>,
    #[serde(default)]
    additions: Option<u64>,
    #[serde(default)]
    deletions: Option<u64>,
}

impl RawPullRequest {
    pub fn merged(&self) -> bool {
        self.merged.unwrap_or(false)
    }

    pub fn review_comments(&self) -> u64 {
        self.review_comments.unwrap_or(0)
    }

    /// Lines added plus lines removed
    pub fn changed_lines(&self) -> u64 {
        self.additions
            .unwrap_or(0)
            .saturating_add(self.deletions.unwrap_or(0))
    }
}

/// Event identifiers are strings on the wire but numbers in some exports
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(id) => write!(f, "{}", id),
            RawId::Number(id) => write!(f, "{}", id),
        }
    }
}

/// Repository activity event as returned by the repository events endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RawRepoEvent {
    pub id: RawId,
    #[serde(rename = "type")]
    pub event_type: String,
    pub created_at: String,
    pub actor: RawActor,
    #[serde(default)]
    payload: Option<RawEventPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEventPayload {
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub ref_type: Option<String>,
    #[serde(default)]
    pub commits: Option<Vec<serde_json::Value>>,
}

/// The repository event types that describe file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperationKind {
    Push,
    Create,
    Delete,
}

impl FileOperationKind {
    /// Map a provider event type name; other activity is not a file operation
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "PushEvent" => Some(FileOperationKind::Push),
            "CreateEvent" => Some(FileOperationKind::Create),
            "DeleteEvent" => Some(FileOperationKind::Delete),
            _ => None,
        }
    }
}

impl RawRepoEvent {
    pub fn file_operation(&self) -> Option<FileOperationKind> {
        FileOperationKind::from_event_type(&self.event_type)
    }

    /// Ref named by the payload, empty when absent
    pub fn git_ref(&self) -> &str {
        self.payload
            .as_ref()
            .and_then(|p| p.git_ref.as_deref())
            .unwrap_or("")
    }

    pub fn ref_type(&self) -> Option<&str> {
        self.payload.as_ref().and_then(|p| p.ref_type.as_deref())
    }

    /// Number of commits batched into a push
    pub fn commits_count(&self) -> usize {
        self.payload
            .as_ref()
            .and_then(|p| p.commits.as_ref())
            .map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitRef {
    pub sha: String,
}

/// Branch as returned by the list-branches endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RawBranch {
    pub name: String,
    pub commit: RawCommitRef,
    #[serde(default)]
    protected: Option<bool>,
}

impl RawBranch {
    pub fn protected(&self) -> bool {
        self.protected.unwrap_or(false)
    }
}

/// Tag as returned by the list-tags endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RawTag {
    pub name: String,
    pub commit: RawCommitRef,
}
