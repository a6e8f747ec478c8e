//! Tests for ScanOrchestrator

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::compliance::{EventType, RecordKind};
use crate::core::time::FixedClock;
use crate::provider::ProviderError;
use crate::scanner::manager::ScanOrchestrator;
use crate::scanner::tests::helpers::*;
use crate::scanner::types::ScanOptions;

fn fast_options() -> ScanOptions {
    ScanOptions {
        pacing_delay: Duration::ZERO,
        ..ScanOptions::default()
    }
}

fn orchestrator(client: Arc<ScriptedClient>, options: ScanOptions) -> ScanOrchestrator {
    let resolver = FixedOwnerResolver {
        owner: "acme",
        client: client.clone(),
    };
    ScanOrchestrator::new(
        client,
        Arc::new(resolver),
        Arc::new(FixedClock::parse("2024-05-31T00:00:00Z").unwrap()),
        options,
    )
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_scan_merges_every_kind_and_repository() {
    let client = Arc::new(
        ScriptedClient::new()
            .respond(
                "acme/widgets",
                RecordKind::Commits,
                vec![commit_record("c1", "fix: handle empty input", "2024-05-30T10:00:00Z")],
            )
            .respond(
                "acme/widgets",
                RecordKind::PullRequests,
                vec![pull_request_record(4, None, 0)],
            )
            .respond(
                "acme/widgets",
                RecordKind::RepositoryEvents,
                vec![repo_event_record("9", "CreateEvent")],
            )
            .respond("acme/widgets", RecordKind::Branches, vec![branch_record("main", true)])
            .respond("other/gadgets", RecordKind::Tags, vec![tag_record("v1.0")]),
    );

    let outcome = orchestrator(client.clone(), fast_options())
        .scan(&names(&["widgets", "other/gadgets"]))
        .await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.repositories, names(&["acme/widgets", "other/gadgets"]));
    assert_eq!(outcome.events.len(), 5);

    let types: Vec<EventType> = outcome.events.iter().map(|e| e.event_type()).collect();
    assert_eq!(
        types,
        vec![
            EventType::Commit,
            EventType::PullRequest,
            EventType::FileCreate,
            EventType::BranchStatus,
            EventType::TagStatus
        ]
    );
    assert_eq!(outcome.events[4].repository(), "other/gadgets");
    assert_eq!(outcome.events[3].timestamp(), "2024-05-31T00:00:00Z");

    // five collector calls per repository
    assert_eq!(client.calls().len(), 10);
}

#[tokio::test]
async fn test_commit_window_comes_from_clock() {
    let client = Arc::new(ScriptedClient::new());
    let options = ScanOptions {
        lookback_days: 7,
        ..fast_options()
    };

    orchestrator(client.clone(), options)
        .scan(&names(&["widgets"]))
        .await;

    let commit_call = client
        .calls()
        .into_iter()
        .find(|c| c.kind == RecordKind::Commits)
        .unwrap();
    assert_eq!(commit_call.argument.as_deref(), Some("2024-05-24T00:00:00Z"));
}

#[tokio::test]
async fn test_failure_is_contained_to_its_call() {
    let client = Arc::new(
        ScriptedClient::new()
            .fail(
                "acme/widgets",
                RecordKind::Commits,
                ProviderError::RateLimited {
                    status: 403,
                    message: "API rate limit exceeded".to_string(),
                },
            )
            .fail(
                "acme/broken",
                RecordKind::Branches,
                ProviderError::Network {
                    message: "connection reset".to_string(),
                },
            )
            .respond("acme/widgets", RecordKind::Branches, vec![branch_record("main", false)])
            .respond("acme/broken", RecordKind::Tags, vec![tag_record("v2")]),
    );

    let outcome = orchestrator(client, fast_options())
        .scan(&names(&["widgets", "broken"]))
        .await;

    assert!(!outcome.is_complete());
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(outcome.failures[0].repository, "acme/widgets");
    assert_eq!(outcome.failures[0].kind, RecordKind::Commits);
    assert_eq!(outcome.failures[0].error.status(), 403);
    assert_eq!(outcome.failures[1].kind, RecordKind::Branches);
    assert_eq!(outcome.failures[1].error.status(), 0);

    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.repositories.len(), 2);
}

#[tokio::test]
async fn test_duplicate_repositories_scanned_once() {
    let client = Arc::new(ScriptedClient::new());
    let scanner = orchestrator(client.clone(), fast_options());

    let resolved = scanner
        .resolve_repositories(&names(&["widgets", "acme/widgets", "gadgets"]))
        .await;
    assert_eq!(resolved, names(&["acme/widgets", "acme/gadgets"]));

    let outcome = scanner.scan(&names(&["widgets", "acme/widgets"])).await;
    assert_eq!(outcome.repositories, names(&["acme/widgets"]));
    assert_eq!(client.calls().len(), 5);
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let client = Arc::new(ScriptedClient::new().with_latency(Duration::from_millis(20)));
    let options = ScanOptions {
        max_concurrent: 2,
        ..fast_options()
    };
    let repositories: Vec<String> = (0..6).map(|i| format!("repo{}", i)).collect();

    let outcome = orchestrator(client.clone(), options).scan(&repositories).await;

    assert_eq!(outcome.repositories.len(), 6);
    assert_eq!(outcome.repositories[5], "acme/repo5");
    assert!(client.peak_in_flight() >= 5, "collectors should overlap");
    assert!(
        client.peak_in_flight() <= 10,
        "at most two repositories in flight, saw {} calls",
        client.peak_in_flight()
    );
}

#[tokio::test]
async fn test_pacing_delay_after_each_repository() {
    let client = Arc::new(ScriptedClient::new());
    let options = ScanOptions {
        max_concurrent: 1,
        pacing_delay: Duration::from_millis(30),
        ..ScanOptions::default()
    };

    let started = Instant::now();
    orchestrator(client, options)
        .scan(&names(&["one", "two"]))
        .await;
    assert!(started.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_empty_repository_list() {
    let client = Arc::new(ScriptedClient::new());
    let outcome = orchestrator(client.clone(), fast_options()).scan(&[]).await;
    assert!(outcome.events.is_empty());
    assert!(outcome.repositories.is_empty());
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_missing_repositories_are_not_scanned() {
    let client = Arc::new(
        ScriptedClient::new()
            .without("acme/ghost")
            .respond("acme/widgets", RecordKind::Tags, vec![tag_record("v1.0")]),
    );

    let outcome = orchestrator(client.clone(), fast_options())
        .scan(&names(&["ghost", "widgets"]))
        .await;

    assert_eq!(outcome.repositories, names(&["acme/widgets"]));
    assert!(outcome.is_complete());
    assert!(client.calls().iter().all(|c| c.repository == "acme/widgets"));
}

#[tokio::test]
async fn test_huge_lookback_window_still_scans() {
    let client = Arc::new(ScriptedClient::new());
    let options = ScanOptions {
        lookback_days: u32::MAX,
        ..fast_options()
    };

    let outcome = orchestrator(client.clone(), options)
        .scan(&names(&["widgets"]))
        .await;

    assert_eq!(outcome.repositories, names(&["acme/widgets"]));
    let commit_call = client
        .calls()
        .into_iter()
        .find(|c| c.kind == RecordKind::Commits)
        .unwrap();
    assert!(commit_call.argument.unwrap().starts_with('-'));
}
