//! Risk Aggregator
//!
//! Derives every statistic in a report from an immutable event slice: tallies
//! per type, repository and user, the risk tier distribution and the daily
//! trend series. An empty slice yields zero-valued results.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};
use strum_macros::{Display, EnumIter};

use crate::compliance::ComplianceEvent;
use crate::core::date_parser::parse_event_date;

/// Scores below this are high risk
pub const HIGH_RISK_BELOW: f64 = 0.5;
/// Scores below this (and not high risk) are medium risk
pub const MEDIUM_RISK_BELOW: f64 = 0.8;
pub const TOP_CONTRIBUTORS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum RiskTier {
    #[strum(serialize = "High Risk")]
    High,
    #[strum(serialize = "Medium Risk")]
    Medium,
    #[strum(serialize = "Low Risk")]
    Low,
}

impl RiskTier {
    pub fn for_score(score: f64) -> Self {
        if score < HIGH_RISK_BELOW {
            RiskTier::High
        } else if score < MEDIUM_RISK_BELOW {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct RiskDistribution {
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
}

impl RiskDistribution {
    pub fn count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::High => self.high_risk,
            RiskTier::Medium => self.medium_risk,
            RiskTier::Low => self.low_risk,
        }
    }

    pub fn total(&self) -> usize {
        self.high_risk + self.medium_risk + self.low_risk
    }

    /// Share of each tier in percent; all zero when there are no events
    pub fn percentages(&self) -> RiskPercentages {
        let total = self.total();
        let percent = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };
        RiskPercentages {
            high_risk: percent(self.high_risk),
            medium_risk: percent(self.medium_risk),
            low_risk: percent(self.low_risk),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct RiskPercentages {
    pub high_risk: f64,
    pub medium_risk: f64,
    pub low_risk: f64,
}

impl RiskPercentages {
    pub fn percent(&self, tier: RiskTier) -> f64 {
        match tier {
            RiskTier::High => self.high_risk,
            RiskTier::Medium => self.medium_risk,
            RiskTier::Low => self.low_risk,
        }
    }
}

/// Most active users, most events first; serialized as an object whose keys
/// keep that rank order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopContributors(pub Vec<(String, usize)>);

impl Serialize for TopContributors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (user, count) in &self.0 {
            map.serialize_entry(user, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Summary {
    pub events_by_type: BTreeMap<String, usize>,
    pub events_by_repository: BTreeMap<String, usize>,
    pub top_contributors: TopContributors,
    pub average_compliance_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Improving,
    #[default]
    Stable,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ComplianceTrends {
    /// Average score per calendar day, keyed `YYYY-MM-DD`
    pub daily_compliance_scores: BTreeMap<String, f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy)]
pub struct RiskAggregator {
    top_contributors: usize,
}

impl Default for RiskAggregator {
    fn default() -> Self {
        Self {
            top_contributors: TOP_CONTRIBUTORS,
        }
    }
}

impl RiskAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_contributors(mut self, limit: usize) -> Self {
        self.top_contributors = limit;
        self
    }

    pub fn summarize(&self, events: &[ComplianceEvent]) -> Summary {
        let mut events_by_type = BTreeMap::new();
        let mut events_by_repository = BTreeMap::new();
        let mut events_by_user: HashMap<&str, usize> = HashMap::new();

        for event in events {
            *events_by_type
                .entry(event.event_type().to_string())
                .or_insert(0) += 1;
            *events_by_repository
                .entry(event.repository().to_string())
                .or_insert(0) += 1;
            *events_by_user.entry(event.user()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(String, usize)> = events_by_user
            .into_iter()
            .map(|(user, count)| (user.to_string(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.top_contributors);

        Summary {
            events_by_type,
            events_by_repository,
            top_contributors: TopContributors(ranked),
            average_compliance_score: mean(events.iter().map(ComplianceEvent::compliance_score)),
        }
    }

    pub fn risk_distribution(&self, events: &[ComplianceEvent]) -> RiskDistribution {
        let mut distribution = RiskDistribution::default();
        for event in events {
            match RiskTier::for_score(event.compliance_score()) {
                RiskTier::High => distribution.high_risk += 1,
                RiskTier::Medium => distribution.medium_risk += 1,
                RiskTier::Low => distribution.low_risk += 1,
            }
        }
        distribution
    }

    /// Events in the high risk tier, in input order
    pub fn high_risk<'a>(&self, events: &'a [ComplianceEvent]) -> Vec<&'a ComplianceEvent> {
        events
            .iter()
            .filter(|e| RiskTier::for_score(e.compliance_score()) == RiskTier::High)
            .collect()
    }

    /// Daily averages over events with a parseable timestamp. The trend is
    /// improving when the latest day averages above the earliest one.
    pub fn trends(&self, events: &[ComplianceEvent]) -> ComplianceTrends {
        let mut by_day: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for event in events {
            match parse_event_date(event.timestamp()) {
                Some(date) => by_day
                    .entry(date.format("%Y-%m-%d").to_string())
                    .or_default()
                    .push(event.compliance_score()),
                None => log::trace!("No trend date for timestamp '{}'", event.timestamp()),
            }
        }

        let daily_compliance_scores: BTreeMap<String, f64> = by_day
            .into_iter()
            .map(|(day, scores)| (day, mean(scores.into_iter())))
            .collect();

        let first = daily_compliance_scores.values().next();
        let last = daily_compliance_scores.values().next_back();
        let trend = match (first, last) {
            (Some(first), Some(last)) if daily_compliance_scores.len() > 1 && last > first => {
                Trend::Improving
            }
            _ => Trend::Stable,
        };

        ComplianceTrends {
            daily_compliance_scores,
            trend,
        }
    }
}

/// Arithmetic mean, summing in iteration order; zero for no values
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
