//! Collector
//!
//! Drives one provider call for one record kind and repository, then
//! normalizes whatever came back. A provider failure is reported as a value,
//! never raised.

use crate::compliance::{ComplianceEvent, EventNormalizer, RecordKind};
use crate::provider::{ProviderClient, ProviderError};
use crate::scanner::types::PageSizes;

/// Pull requests are requested in every state
pub const PULL_REQUEST_STATE: &str = "all";

/// Result of a single collector call
#[derive(Debug, Clone, PartialEq)]
pub enum CollectOutcome {
    Collected(Vec<ComplianceEvent>),
    /// The call failed; it contributes no events
    Failed(ProviderError),
}

impl CollectOutcome {
    pub fn events(&self) -> &[ComplianceEvent] {
        match self {
            CollectOutcome::Collected(events) => events,
            CollectOutcome::Failed(_) => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CollectOutcome::Failed(_))
    }
}

/// Collects every record kind for one repository
pub struct Collector<'a> {
    client: &'a dyn ProviderClient,
    normalizer: &'a EventNormalizer,
    since: &'a str,
    page_sizes: PageSizes,
}

impl<'a> Collector<'a> {
    /// `since` bounds the commit listing and is ignored by other kinds
    pub fn new(
        client: &'a dyn ProviderClient,
        normalizer: &'a EventNormalizer,
        since: &'a str,
        page_sizes: PageSizes,
    ) -> Self {
        Self {
            client,
            normalizer,
            since,
            page_sizes,
        }
    }

    pub async fn collect(&self, kind: RecordKind) -> CollectOutcome {
        let repository = self.normalizer.repository();
        let page_size = self.page_sizes.for_kind(kind);

        let fetched = match kind {
            RecordKind::Commits => {
                self.client
                    .fetch_commits(repository, self.since, page_size)
                    .await
            }
            RecordKind::PullRequests => {
                self.client
                    .fetch_pull_requests(repository, PULL_REQUEST_STATE, page_size)
                    .await
            }
            RecordKind::RepositoryEvents => {
                self.client.fetch_repo_events(repository, page_size).await
            }
            RecordKind::Branches => self.client.fetch_branches(repository, page_size).await,
            RecordKind::Tags => self.client.fetch_tags(repository, page_size).await,
        };

        match fetched {
            Ok(records) => {
                log::debug!("{}: {} {} records", repository, records.len(), kind);
                CollectOutcome::Collected(self.normalizer.normalize_all(kind, &records))
            }
            Err(error) => CollectOutcome::Failed(error),
        }
    }
}
