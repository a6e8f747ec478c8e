//! End-to-end scan tests
//!
//! Drive the full run sequence (resolve, scan, aggregate, persist) against a
//! scripted provider and inspect the written report.

mod common;

use common::fixtures;
use common::provider::{Endpoint, ScriptedProvider};
use repoaudit::app::cli::{AppConfig, Args};
use repoaudit::app::startup::execute;
use repoaudit::core::time::FixedClock;
use repoaudit::report::recommendations::{
    COMMIT_MESSAGE_QUALITY, COMMIT_SIZE, COMPLIANCE_GOOD, PULL_REQUEST_DESCRIPTIONS,
    PULL_REQUEST_REVIEWS,
};
use repoaudit::report::{ReportError, Trend};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const EPSILON: f64 = 1e-9;

fn config(repositories: &[&str], output: &Path) -> AppConfig {
    AppConfig::from_args(Args {
        repository: repositories.iter().map(|r| r.to_string()).collect(),
        output: Some(output.display().to_string()),
        pacing_ms: Some(0),
        token: Some("test-token".to_string()),
        ..Args::default()
    })
    .unwrap()
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::parse("2024-06-01T00:00:00Z").unwrap())
}

fn populated_provider() -> ScriptedProvider {
    ScriptedProvider::new()
        .with_login("octo")
        .with(
            "octo/widgets",
            Endpoint::Commits,
            vec![
                fixtures::commit("c1", "fix", "Ada", "2024-05-30T10:00:00Z", 25),
                fixtures::commit(
                    "c2",
                    "feat: add widget support for dashboard",
                    "Ada",
                    "2024-05-31T10:00:00Z",
                    3,
                ),
            ],
        )
        .with(
            "octo/widgets",
            Endpoint::Pulls,
            vec![fixtures::pull_request(1, "octo", "2024-05-29T12:00:00Z", None, 0, 1500)],
        )
        .with(
            "octo/widgets",
            Endpoint::Events,
            vec![
                fixtures::event(11, "DeleteEvent", "octo", "2024-05-31T08:00:00Z", 0),
                fixtures::event(12, "PushEvent", "octo", "2024-05-30T08:00:00Z", 12),
                fixtures::event(13, "WatchEvent", "octo", "2024-05-30T09:00:00Z", 0),
            ],
        )
        .with(
            "octo/widgets",
            Endpoint::Branches,
            vec![fixtures::branch("main", true), fixtures::branch("dev", false)],
        )
        .with("octo/widgets", Endpoint::Tags, vec![fixtures::tag("v1.0")])
        .failing("acme/gadgets", Endpoint::Commits, 500)
        .with("acme/gadgets", Endpoint::Tags, vec![fixtures::tag("v2.0")])
}

#[tokio::test]
async fn test_full_scan_report() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("compliance_report.json");
    let provider = Arc::new(populated_provider());

    let report = execute(
        &config(&["widgets", "acme/gadgets"], &output),
        provider.clone(),
        clock(),
    )
    .await
    .unwrap();

    assert_eq!(
        provider.requested_repositories(),
        vec!["acme/gadgets", "octo/widgets"]
    );

    assert_eq!(report.total_events, 9);
    assert_eq!(report.repositories_scanned, 2);
    assert_eq!(report.scan_period, "Last 30 days");
    assert_eq!(report.generated_at, "2024-06-01T00:00:00Z");

    let metrics = &report.compliance_metrics;
    assert_eq!(metrics.risk_distribution.high_risk, 2);
    assert_eq!(metrics.risk_distribution.medium_risk, 1);
    assert_eq!(metrics.risk_distribution.low_risk, 6);
    let p = metrics.risk_percentages;
    assert!((p.high_risk + p.medium_risk + p.low_risk - 100.0).abs() < EPSILON);
    assert_eq!(
        metrics.recommendations,
        vec![
            COMMIT_MESSAGE_QUALITY,
            COMMIT_SIZE,
            PULL_REQUEST_DESCRIPTIONS,
            PULL_REQUEST_REVIEWS
        ]
    );

    let trends = &metrics.compliance_trends;
    assert_eq!(trends.daily_compliance_scores.len(), 4);
    assert!((trends.daily_compliance_scores["2024-05-30"] - 0.55).abs() < EPSILON);
    assert_eq!(trends.trend, Trend::Improving);

    assert_eq!(
        report.summary.top_contributors.0,
        vec![
            ("system".to_string(), 4),
            ("octo".to_string(), 3),
            ("Ada".to_string(), 2)
        ]
    );
    assert_eq!(report.summary.events_by_repository["octo/widgets"], 8);
    assert_eq!(report.summary.events_by_repository["acme/gadgets"], 1);

    let newest = &report.detailed_events[0];
    assert_eq!(newest.timestamp(), "2024-06-01T00:00:00Z");
    let oldest = report.detailed_events.last().unwrap();
    assert_eq!(oldest.timestamp(), "2024-05-29T12:00:00Z");
    assert!((oldest.compliance_score() - 0.4).abs() < EPSILON);
}

#[tokio::test]
async fn test_written_report_matches_returned_report() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");

    let report = execute(
        &config(&["widgets", "acme/gadgets"], &output),
        Arc::new(populated_provider()),
        clock(),
    )
    .await
    .unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["generated_at"], report.generated_at.as_str());
    assert_eq!(
        written["detailed_events"].as_array().unwrap().len(),
        report.detailed_events.len()
    );
    assert_eq!(written["total_events"], 9);
    assert_eq!(written["summary"]["events_by_type"]["file_delete"], 1);
    assert_eq!(written["summary"]["events_by_type"]["file_push"], 1);
    let delete = written["detailed_events"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["type"] == "file_delete")
        .unwrap();
    assert_eq!(delete["compliance_score"], 0.8);
    assert_eq!(delete["details"]["ref"], "refs/heads/main");
}

#[tokio::test]
async fn test_all_collectors_failing_yields_empty_report() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");
    let provider = ScriptedProvider::new()
        .failing("acme/widgets", Endpoint::Commits, 502)
        .failing("acme/widgets", Endpoint::Pulls, 404)
        .failing("acme/widgets", Endpoint::Events, 403)
        .failing("acme/widgets", Endpoint::Branches, 500)
        .failing("acme/widgets", Endpoint::Tags, 401);

    let report = execute(&config(&["acme/widgets"], &output), Arc::new(provider), clock())
        .await
        .unwrap();

    assert_eq!(report.total_events, 0);
    assert_eq!(report.repositories_scanned, 0);
    assert_eq!(report.summary.average_compliance_score, 0.0);
    assert_eq!(report.compliance_metrics.recommendations, vec![COMPLIANCE_GOOD]);
    assert_eq!(report.compliance_metrics.compliance_trends.trend, Trend::Stable);
    assert!(output.exists());
}

#[tokio::test]
async fn test_unresolvable_owner_keeps_short_name() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");
    let provider = Arc::new(
        ScriptedProvider::new().with("widgets", Endpoint::Tags, vec![fixtures::tag("v0.1")]),
    );

    let report = execute(&config(&["widgets"], &output), provider.clone(), clock())
        .await
        .unwrap();

    assert_eq!(provider.requested_repositories(), vec!["widgets"]);
    assert_eq!(report.detailed_events[0].repository(), "widgets");
}

#[tokio::test]
async fn test_top_contributor_limit_is_applied() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");
    let mut config = config(&["widgets", "acme/gadgets"], &output);
    config.top_contributors = 2;

    let report = execute(&config, Arc::new(populated_provider()), clock())
        .await
        .unwrap();

    let ranked: Vec<&str> = report
        .summary
        .top_contributors
        .0
        .iter()
        .map(|(user, _)| user.as_str())
        .collect();
    assert_eq!(ranked, vec!["system", "octo"]);
}

#[tokio::test]
async fn test_missing_repository_is_skipped() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.json");
    let provider = Arc::new(
        ScriptedProvider::new()
            .with_login("octo")
            .without("octo/archived")
            .with("octo/widgets", Endpoint::Tags, vec![fixtures::tag("v1.0")]),
    );

    let report = execute(
        &config(&["archived", "widgets"], &output),
        provider.clone(),
        clock(),
    )
    .await
    .unwrap();

    assert_eq!(provider.requested_repositories(), vec!["octo/widgets"]);
    assert_eq!(report.repositories_scanned, 1);
    assert_eq!(report.total_events, 1);
}

#[tokio::test]
async fn test_persistence_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("no-such-dir").join("report.json");

    let err = execute(
        &config(&["acme/widgets"], &output),
        Arc::new(ScriptedProvider::new()),
        clock(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ReportError::Io { .. }));
}
