//! Scanner Types
//!
//! Options that shape a scan and the outcome handed back to reporting.

use std::time::Duration;

use crate::compliance::{ComplianceEvent, RecordKind};
use crate::provider::ProviderError;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
pub const DEFAULT_MAX_CONCURRENT: usize = 4;
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(1000);

/// Records requested per provider call, one page per collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    pub commits: u32,
    pub pull_requests: u32,
    pub repository_events: u32,
    pub branches: u32,
    pub tags: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            commits: 100,
            pull_requests: 100,
            repository_events: 100,
            branches: 100,
            tags: 50,
        }
    }
}

impl PageSizes {
    pub fn for_kind(&self, kind: RecordKind) -> u32 {
        match kind {
            RecordKind::Commits => self.commits,
            RecordKind::PullRequests => self.pull_requests,
            RecordKind::RepositoryEvents => self.repository_events,
            RecordKind::Branches => self.branches,
            RecordKind::Tags => self.tags,
        }
    }
}

/// Scan configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Window for the commit collector, in days back from now
    pub lookback_days: u32,
    pub page_sizes: PageSizes,
    /// Pause after each repository's collectors have finished
    pub pacing_delay: Duration,
    /// Upper bound on repositories scanned at the same time
    pub max_concurrent: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            page_sizes: PageSizes::default(),
            pacing_delay: DEFAULT_PACING_DELAY,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

/// A collector call that returned no records because the provider failed
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorFailure {
    pub repository: String,
    pub kind: RecordKind,
    pub error: ProviderError,
}

/// Everything gathered for a single repository
#[derive(Debug, Clone, Default)]
pub struct RepositoryScan {
    pub repository: String,
    pub events: Vec<ComplianceEvent>,
    pub failures: Vec<CollectorFailure>,
}

impl RepositoryScan {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Default::default()
        }
    }
}

/// Result of scanning every configured repository
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Resolved repository identifiers, in scan order
    pub repositories: Vec<String>,
    pub events: Vec<ComplianceEvent>,
    pub failures: Vec<CollectorFailure>,
}

impl ScanOutcome {
    /// True when every collector call succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn push(&mut self, scan: RepositoryScan) {
        self.repositories.push(scan.repository);
        self.events.extend(scan.events);
        self.failures.extend(scan.failures);
    }
}

impl FromIterator<RepositoryScan> for ScanOutcome {
    fn from_iter<I: IntoIterator<Item = RepositoryScan>>(iter: I) -> Self {
        let mut outcome = ScanOutcome::default();
        for scan in iter {
            outcome.push(scan);
        }
        outcome
    }
}
