//! Recommendation Engine
//!
//! Maps patterns in the high-risk subset to fixed advisory messages. Commit
//! advice always precedes pull request advice.

use crate::compliance::{ComplianceEvent, EventType};

pub const COMMIT_MESSAGE_QUALITY: &str =
    "Improve commit message quality and follow conventional commit format";
pub const COMMIT_SIZE: &str = "Consider breaking down large commits into smaller, focused changes";
pub const PULL_REQUEST_DESCRIPTIONS: &str = "Ensure all pull requests have detailed descriptions";
pub const PULL_REQUEST_REVIEWS: &str = "Implement mandatory code reviews for all pull requests";
pub const COMPLIANCE_GOOD: &str = "Overall compliance is good. Continue current practices.";

#[derive(Debug, Default, Clone, Copy)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Recommendations for the given high-risk events; never empty
    pub fn recommend(&self, high_risk: &[&ComplianceEvent]) -> Vec<String> {
        let has = |event_type: EventType| high_risk.iter().any(|e| e.event_type() == event_type);

        let mut recommendations = Vec::new();
        if has(EventType::Commit) {
            recommendations.push(COMMIT_MESSAGE_QUALITY.to_string());
            recommendations.push(COMMIT_SIZE.to_string());
        }
        if has(EventType::PullRequest) {
            recommendations.push(PULL_REQUEST_DESCRIPTIONS.to_string());
            recommendations.push(PULL_REQUEST_REVIEWS.to_string());
        }
        if recommendations.is_empty() {
            recommendations.push(COMPLIANCE_GOOD.to_string());
        }
        recommendations
    }
}
