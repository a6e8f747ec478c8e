//! Reporting
//!
//! Aggregation, recommendations and report assembly are pure functions of the
//! collected event set. Persistence and the console summary consume the
//! assembled [`Report`].

pub mod aggregator;
pub mod assembler;
pub mod display;
pub mod error;
pub mod recommendations;
pub mod sink;

pub use aggregator::{RiskAggregator, RiskTier, Trend};
pub use assembler::{Report, ReportAssembler};
pub use error::{ReportError, ReportResult};
pub use recommendations::RecommendationEngine;
pub use sink::{sink_for_output, JsonFileSink, ReportSink, StdoutSink};
