//! Clock abstraction for testable time-dependent logic

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Production clock reading the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant, for deterministic reports and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Build from an RFC 3339 string
    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        let instant = DateTime::parse_from_rfc3339(rfc3339)?.with_timezone(&Utc);
        Ok(Self::new(instant))
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Format an instant the way every timestamp in a report is written
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
