//! Report Assembler
//!
//! Composes aggregation results, recommendations and the sorted event list
//! into one serializable [`Report`]. The event set is only read.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::compliance::ComplianceEvent;
use crate::core::time::{format_timestamp, Clock};
use crate::report::aggregator::{
    ComplianceTrends, RiskAggregator, RiskDistribution, RiskPercentages, Summary,
};
use crate::report::recommendations::RecommendationEngine;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceMetrics {
    pub risk_distribution: RiskDistribution,
    pub risk_percentages: RiskPercentages,
    pub compliance_trends: ComplianceTrends,
    pub recommendations: Vec<String>,
}

/// Complete compliance report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub scan_period: String,
    pub total_events: usize,
    /// Distinct repositories among the events
    pub repositories_scanned: usize,
    pub summary: Summary,
    pub compliance_metrics: ComplianceMetrics,
    /// Every event, newest first
    pub detailed_events: Vec<ComplianceEvent>,
}

pub fn scan_period_label(lookback_days: u32) -> String {
    format!("Last {} days", lookback_days)
}

pub struct ReportAssembler {
    clock: Arc<dyn Clock>,
    lookback_days: u32,
    aggregator: RiskAggregator,
    recommendations: RecommendationEngine,
}

impl ReportAssembler {
    pub fn new(clock: Arc<dyn Clock>, lookback_days: u32) -> Self {
        Self {
            clock,
            lookback_days,
            aggregator: RiskAggregator::new(),
            recommendations: RecommendationEngine::new(),
        }
    }

    pub fn with_aggregator(mut self, aggregator: RiskAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn assemble(&self, events: &[ComplianceEvent]) -> Report {
        let repositories_scanned = events
            .iter()
            .map(ComplianceEvent::repository)
            .collect::<BTreeSet<_>>()
            .len();

        let risk_distribution = self.aggregator.risk_distribution(events);
        let high_risk = self.aggregator.high_risk(events);

        let mut detailed_events = events.to_vec();
        detailed_events.sort_by(ComplianceEvent::cmp_newest_first);

        Report {
            generated_at: format_timestamp(&self.clock.now_utc()),
            scan_period: scan_period_label(self.lookback_days),
            total_events: events.len(),
            repositories_scanned,
            summary: self.aggregator.summarize(events),
            compliance_metrics: ComplianceMetrics {
                risk_distribution,
                risk_percentages: risk_distribution.percentages(),
                compliance_trends: self.aggregator.trends(events),
                recommendations: self.recommendations.recommend(&high_risk),
            },
            detailed_events,
        }
    }
}
