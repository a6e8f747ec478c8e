//! Compliance event model
//!
//! A [`ComplianceEvent`] is created once per observed activity record and never
//! mutated afterwards. Its kind is carried by the [`EventDetails`] variant, so
//! the event type and the attribute set can never disagree.

use serde::Serialize;
use std::cmp::Ordering;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::core::date_parser::parse_instant;

/// Kind of activity an event was derived from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Commit,
    PullRequest,
    FilePush,
    FileCreate,
    FileDelete,
    BranchStatus,
    TagStatus,
}

/// Attributes of a commit event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitDetails {
    pub sha: String,
    pub message: String,
    pub files_changed: usize,
    pub additions: u64,
    pub deletions: u64,
}

/// Attributes of a pull request event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestDetails {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub merged: bool,
    pub mergeable: Option<bool>,
    pub review_comments: u64,
}

/// Attributes shared by push, create and delete events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOperationDetails {
    pub event_id: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub ref_type: Option<String>,
    pub commits_count: usize,
}

/// Attributes of a branch status snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchDetails {
    pub name: String,
    pub protected: bool,
    pub commit_sha: String,
}

/// Attributes of a tag status snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDetails {
    pub name: String,
    pub commit_sha: String,
}

/// Kind-specific attributes of an event; serialized without a tag since the
/// owning event already writes its `type`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventDetails {
    Commit(CommitDetails),
    PullRequest(PullRequestDetails),
    FilePush(FileOperationDetails),
    FileCreate(FileOperationDetails),
    FileDelete(FileOperationDetails),
    BranchStatus(BranchDetails),
    TagStatus(TagDetails),
}

impl EventDetails {
    pub fn event_type(&self) -> EventType {
        match self {
            EventDetails::Commit(_) => EventType::Commit,
            EventDetails::PullRequest(_) => EventType::PullRequest,
            EventDetails::FilePush(_) => EventType::FilePush,
            EventDetails::FileCreate(_) => EventType::FileCreate,
            EventDetails::FileDelete(_) => EventType::FileDelete,
            EventDetails::BranchStatus(_) => EventType::BranchStatus,
            EventDetails::TagStatus(_) => EventType::TagStatus,
        }
    }
}

/// Actor recorded for events without a human author
pub const SYSTEM_USER: &str = "system";

/// One normalized, scored activity record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceEvent {
    timestamp: String,
    #[serde(rename = "type")]
    event_type: EventType,
    repository: String,
    user: String,
    compliance_score: f64,
    details: EventDetails,
}

impl ComplianceEvent {
    /// Create an event; the score is clamped into `[0.0, 1.0]`
    pub fn new(
        timestamp: impl Into<String>,
        repository: impl Into<String>,
        user: impl Into<String>,
        details: EventDetails,
        compliance_score: f64,
    ) -> Self {
        let compliance_score = if compliance_score.is_nan() {
            0.0
        } else {
            compliance_score.clamp(0.0, 1.0)
        };

        Self {
            timestamp: timestamp.into(),
            event_type: details.event_type(),
            repository: repository.into(),
            user: user.into(),
            compliance_score,
            details,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn compliance_score(&self) -> f64 {
        self.compliance_score
    }

    pub fn details(&self) -> &EventDetails {
        &self.details
    }

    /// Newest-first ordering used for report listings.
    ///
    /// Parseable timestamps compare as instants and come before unparseable
    /// ones; unparseable timestamps compare as text, also newest-first.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        match (parse_instant(&self.timestamp), parse_instant(&other.timestamp)) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => other.timestamp.cmp(&self.timestamp),
        }
    }
}
