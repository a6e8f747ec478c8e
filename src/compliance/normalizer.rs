//! Event normalization
//!
//! Turns raw provider records of a known kind into scored [`ComplianceEvent`]s.
//! A record that cannot be decoded is skipped and logged; it never stops the
//! remaining records from being normalized.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum_macros::{Display, EnumIter};

use crate::compliance::event::{
    BranchDetails, CommitDetails, ComplianceEvent, EventDetails, FileOperationDetails,
    PullRequestDetails, TagDetails, SYSTEM_USER,
};
use crate::compliance::scoring;
use crate::core::time::format_timestamp;
use crate::provider::records::{
    FileOperationKind, RawBranch, RawCommit, RawPullRequest, RawRepoEvent, RawTag,
};

/// Kind of raw record a provider call returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    Commits,
    PullRequests,
    RepositoryEvents,
    Branches,
    Tags,
}

/// A record lacking a structurally required field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed {kind} record: {reason}")]
pub struct MalformedRecord {
    pub kind: RecordKind,
    pub reason: String,
}

pub type NormalizeResult<T> = Result<T, MalformedRecord>;

/// Normalizes records for one repository
#[derive(Debug, Clone)]
pub struct EventNormalizer {
    repository: String,
    observed_at: String,
}

impl EventNormalizer {
    /// `observed_at` stamps snapshot records (branches, tags) that carry no
    /// timestamp of their own
    pub fn new(repository: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self {
            repository: repository.into(),
            observed_at: format_timestamp(&observed_at),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Normalize every record, skipping malformed ones and records of
    /// activity that carries no compliance signal
    pub fn normalize_all(&self, kind: RecordKind, records: &[Value]) -> Vec<ComplianceEvent> {
        let mut skipped = 0usize;
        let events: Vec<ComplianceEvent> = records
            .iter()
            .filter_map(|raw| match self.normalize(kind, raw) {
                Ok(event) => event,
                Err(e) => {
                    skipped += 1;
                    log::debug!("{}: skipping record: {}", self.repository, e);
                    None
                }
            })
            .collect();

        if skipped > 0 {
            log::debug!(
                "{}: {} of {} {} records were malformed",
                self.repository,
                skipped,
                records.len(),
                kind
            );
        }
        events
    }

    /// Normalize one record. `Ok(None)` means the record is well-formed but
    /// not an activity the engine scores (e.g. a star event).
    pub fn normalize(
        &self,
        kind: RecordKind,
        raw: &Value,
    ) -> NormalizeResult<Option<ComplianceEvent>> {
        match kind {
            RecordKind::Commits => self.commit(raw).map(Some),
            RecordKind::PullRequests => self.pull_request(raw).map(Some),
            RecordKind::RepositoryEvents => self.file_operation(raw),
            RecordKind::Branches => self.branch(raw).map(Some),
            RecordKind::Tags => self.tag(raw).map(Some),
        }
    }

    pub fn commit(&self, raw: &Value) -> NormalizeResult<ComplianceEvent> {
        let commit: RawCommit = decode(RecordKind::Commits, raw)?;
        let score = scoring::score_commit(&commit);
        let details = EventDetails::Commit(CommitDetails {
            files_changed: commit.files().len(),
            additions: commit.total_additions(),
            deletions: commit.total_deletions(),
            sha: commit.sha,
            message: commit.commit.message,
        });

        Ok(ComplianceEvent::new(
            commit.commit.committer.date,
            self.repository.as_str(),
            commit.commit.author.name,
            details,
            score,
        ))
    }

    pub fn pull_request(&self, raw: &Value) -> NormalizeResult<ComplianceEvent> {
        let pr: RawPullRequest = decode(RecordKind::PullRequests, raw)?;
        let score = scoring::score_pull_request(&pr);
        let details = EventDetails::PullRequest(PullRequestDetails {
            number: pr.number,
            merged: pr.merged(),
            mergeable: pr.mergeable,
            review_comments: pr.review_comments(),
            title: pr.title,
            state: pr.state,
        });

        Ok(ComplianceEvent::new(
            pr.created_at,
            self.repository.as_str(),
            pr.user.login,
            details,
            score,
        ))
    }

    pub fn file_operation(&self, raw: &Value) -> NormalizeResult<Option<ComplianceEvent>> {
        let event: RawRepoEvent = decode(RecordKind::RepositoryEvents, raw)?;
        let (Some(operation), Some(score)) =
            (event.file_operation(), scoring::score_file_operation(&event))
        else {
            return Ok(None);
        };

        let attributes = FileOperationDetails {
            event_id: event.id.to_string(),
            git_ref: event.git_ref().to_string(),
            ref_type: event.ref_type().map(str::to_string),
            commits_count: event.commits_count(),
        };
        let details = match operation {
            FileOperationKind::Push => EventDetails::FilePush(attributes),
            FileOperationKind::Create => EventDetails::FileCreate(attributes),
            FileOperationKind::Delete => EventDetails::FileDelete(attributes),
        };

        Ok(Some(ComplianceEvent::new(
            event.created_at,
            self.repository.as_str(),
            event.actor.login,
            details,
            score,
        )))
    }

    pub fn branch(&self, raw: &Value) -> NormalizeResult<ComplianceEvent> {
        let branch: RawBranch = decode(RecordKind::Branches, raw)?;
        let score = scoring::score_branch(&branch);
        let details = EventDetails::BranchStatus(BranchDetails {
            protected: branch.protected(),
            name: branch.name,
            commit_sha: branch.commit.sha,
        });

        Ok(self.snapshot(details, score))
    }

    pub fn tag(&self, raw: &Value) -> NormalizeResult<ComplianceEvent> {
        let tag: RawTag = decode(RecordKind::Tags, raw)?;
        let score = scoring::score_tag(&tag);
        let details = EventDetails::TagStatus(TagDetails {
            name: tag.name,
            commit_sha: tag.commit.sha,
        });

        Ok(self.snapshot(details, score))
    }

    fn snapshot(&self, details: EventDetails, score: f64) -> ComplianceEvent {
        ComplianceEvent::new(
            self.observed_at.as_str(),
            self.repository.as_str(),
            SYSTEM_USER,
            details,
            score,
        )
    }
}

fn decode<T: DeserializeOwned>(kind: RecordKind, raw: &Value) -> NormalizeResult<T> {
    T::deserialize(raw).map_err(|e| MalformedRecord {
        kind,
        reason: e.to_string(),
    })
}
