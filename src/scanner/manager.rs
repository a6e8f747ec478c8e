//! Scan Orchestrator
//!
//! Central coordination of a scan: resolves the configured repository names,
//! scans up to `max_concurrent` repositories at a time and gathers their
//! results in configured order through a single owner.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::compliance::{EventNormalizer, RecordKind};
use crate::core::date_parser::lookback_start;
use crate::core::time::{format_timestamp, Clock};
use crate::provider::{ProviderClient, RepositoryResolver};
use crate::scanner::collector::{CollectOutcome, Collector};
use crate::scanner::types::{CollectorFailure, RepositoryScan, ScanOptions, ScanOutcome};

pub struct ScanOrchestrator {
    client: Arc<dyn ProviderClient>,
    resolver: Arc<dyn RepositoryResolver>,
    clock: Arc<dyn Clock>,
    options: ScanOptions,
}

impl ScanOrchestrator {
    pub fn new(
        client: Arc<dyn ProviderClient>,
        resolver: Arc<dyn RepositoryResolver>,
        clock: Arc<dyn Clock>,
        options: ScanOptions,
    ) -> Self {
        Self {
            client,
            resolver,
            clock,
            options,
        }
    }

    /// Qualify every configured name, dropping repositories that do not
    /// exist and entries that resolve to a repository already listed
    pub async fn resolve_repositories(&self, names: &[String]) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let Some(repository) = self.resolver.resolve(name).await else {
                continue;
            };
            if resolved.contains(&repository) {
                log::debug!("Skipping duplicate repository {}", repository);
                continue;
            }
            if repository != *name {
                log::debug!("Resolved {} to {}", name, repository);
            }
            resolved.push(repository);
        }
        resolved
    }

    /// Scan all repositories; never fails, provider errors end up in
    /// [`ScanOutcome::failures`]
    pub async fn scan(&self, names: &[String]) -> ScanOutcome {
        let repositories = self.resolve_repositories(names).await;
        let observed_at = self.clock.now_utc();
        let since = format_timestamp(&lookback_start(observed_at, self.options.lookback_days));

        log::info!(
            "Scanning {} repositories (last {} days, up to {} at a time)",
            repositories.len(),
            self.options.lookback_days,
            self.options.max_concurrent.max(1)
        );

        let outcome: ScanOutcome = stream::iter(repositories.iter())
            .map(|repository| self.scan_repository(repository, observed_at, &since))
            .buffered(self.options.max_concurrent.max(1))
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect();

        log::info!(
            "Scan finished: {} events from {} repositories, {} failed collector calls",
            outcome.events.len(),
            outcome.repositories.len(),
            outcome.failures.len()
        );
        outcome
    }

    /// Run the five collectors for one repository concurrently, then pause
    /// for the pacing delay
    pub async fn scan_repository(
        &self,
        repository: &str,
        observed_at: DateTime<Utc>,
        since: &str,
    ) -> RepositoryScan {
        log::info!("Scanning {}", repository);

        let normalizer = EventNormalizer::new(repository, observed_at);
        let collector = Collector::new(
            self.client.as_ref(),
            &normalizer,
            since,
            self.options.page_sizes,
        );

        let (commits, pull_requests, repository_events, branches, tags) = tokio::join!(
            collector.collect(RecordKind::Commits),
            collector.collect(RecordKind::PullRequests),
            collector.collect(RecordKind::RepositoryEvents),
            collector.collect(RecordKind::Branches),
            collector.collect(RecordKind::Tags),
        );

        let mut scan = RepositoryScan::new(repository);
        let outcomes = [commits, pull_requests, repository_events, branches, tags];
        for (kind, outcome) in RecordKind::iter().zip(outcomes) {
            match outcome {
                CollectOutcome::Collected(events) => scan.events.extend(events),
                CollectOutcome::Failed(error) => {
                    log::warn!(
                        "{}: failed to collect {} (status {}): {}",
                        repository,
                        kind,
                        error.status(),
                        error
                    );
                    scan.failures.push(CollectorFailure {
                        repository: repository.to_string(),
                        kind,
                        error,
                    });
                }
            }
        }

        log::info!(
            "Finished {}: {} events, {} failed collectors",
            repository,
            scan.events.len(),
            scan.failures.len()
        );

        if !self.options.pacing_delay.is_zero() {
            tokio::time::sleep(self.options.pacing_delay).await;
        }
        scan
    }
}
