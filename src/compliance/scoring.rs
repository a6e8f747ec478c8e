//! Scoring rules
//!
//! One pure function per record kind. Every rule starts from [`BASE_SCORE`],
//! applies its penalties in a fixed order and floors the result at zero, so
//! identical input always yields a bit-identical score.

use crate::provider::records::{
    FileOperationKind, RawBranch, RawCommit, RawPullRequest, RawRepoEvent, RawTag,
};

pub const BASE_SCORE: f64 = 1.0;

/// Thresholds for commits
pub mod commit {
    /// Messages shorter than this (in characters) are penalised
    pub const MIN_MESSAGE_LENGTH: usize = 10;
    pub const SHORT_MESSAGE_PENALTY: f64 = 0.3;
    /// Matched case-insensitively anywhere in the message
    pub const CONVENTIONAL_PREFIXES: [&str; 7] = [
        "feat:",
        "fix:",
        "docs:",
        "style:",
        "refactor:",
        "test:",
        "chore:",
    ];
    pub const NON_CONVENTIONAL_PENALTY: f64 = 0.2;
    pub const MAX_FILES_CHANGED: usize = 20;
    pub const LARGE_COMMIT_PENALTY: f64 = 0.2;
}

/// Thresholds for pull requests
pub mod pull_request {
    pub const MIN_DESCRIPTION_LENGTH: usize = 20;
    pub const MISSING_DESCRIPTION_PENALTY: f64 = 0.3;
    pub const UNREVIEWED_PENALTY: f64 = 0.2;
    pub const MAX_CHANGED_LINES: u64 = 1000;
    pub const LARGE_CHANGE_PENALTY: f64 = 0.1;
}

/// Thresholds for push, create and delete events
pub mod file_operation {
    pub const MAX_PUSH_COMMITS: usize = 10;
    pub const LARGE_PUSH_PENALTY: f64 = 0.2;
    /// Flat score for deletions, not a penalty
    pub const DELETE_SCORE: f64 = 0.8;
}

/// Fixed scores for branch snapshots
pub mod branch {
    pub const PROTECTED_SCORE: f64 = 1.0;
    pub const UNPROTECTED_SCORE: f64 = 0.7;
}

/// Fixed score for tag snapshots
pub mod tag {
    pub const SCORE: f64 = 0.9;
}

fn floor(score: f64) -> f64 {
    score.max(0.0)
}

/// Whether a commit message contains a conventional-commit prefix
pub fn has_conventional_prefix(message: &str) -> bool {
    let lowered = message.to_lowercase();
    commit::CONVENTIONAL_PREFIXES
        .iter()
        .any(|prefix| lowered.contains(prefix))
}

pub fn score_commit(raw: &RawCommit) -> f64 {
    let message = &raw.commit.message;
    let mut score = BASE_SCORE;

    if message.chars().count() < commit::MIN_MESSAGE_LENGTH {
        score -= commit::SHORT_MESSAGE_PENALTY;
    }
    if !has_conventional_prefix(message) {
        score -= commit::NON_CONVENTIONAL_PENALTY;
    }
    if raw.files().len() > commit::MAX_FILES_CHANGED {
        score -= commit::LARGE_COMMIT_PENALTY;
    }

    floor(score)
}

pub fn score_pull_request(raw: &RawPullRequest) -> f64 {
    let mut score = BASE_SCORE;

    let described = raw
        .body
        .as_deref()
        .is_some_and(|body| body.chars().count() >= pull_request::MIN_DESCRIPTION_LENGTH);
    if !described {
        score -= pull_request::MISSING_DESCRIPTION_PENALTY;
    }
    if raw.review_comments() == 0 {
        score -= pull_request::UNREVIEWED_PENALTY;
    }
    if raw.changed_lines() > pull_request::MAX_CHANGED_LINES {
        score -= pull_request::LARGE_CHANGE_PENALTY;
    }

    floor(score)
}

/// Score a repository event; `None` when the event is not a file operation
pub fn score_file_operation(raw: &RawRepoEvent) -> Option<f64> {
    let score = match raw.file_operation()? {
        FileOperationKind::Push if raw.commits_count() > file_operation::MAX_PUSH_COMMITS => {
            BASE_SCORE - file_operation::LARGE_PUSH_PENALTY
        }
        FileOperationKind::Push | FileOperationKind::Create => BASE_SCORE,
        FileOperationKind::Delete => file_operation::DELETE_SCORE,
    };
    Some(floor(score))
}

pub fn score_branch(raw: &RawBranch) -> f64 {
    if raw.protected() {
        branch::PROTECTED_SCORE
    } else {
        branch::UNPROTECTED_SCORE
    }
}

pub fn score_tag(_raw: &RawTag) -> f64 {
    tag::SCORE
}
