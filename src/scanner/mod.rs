//! Scanner Component
//!
//! Runs every collector over every configured repository and merges the
//! results into a single [`ScanOutcome`]. Provider failures are contained per
//! collector call; they are logged and recorded but never stop the scan.

pub mod collector;
pub mod manager;
pub mod types;

#[cfg(test)]
mod tests;

pub use collector::{CollectOutcome, Collector};
pub use manager::ScanOrchestrator;
pub use types::{CollectorFailure, PageSizes, RepositoryScan, ScanOptions, ScanOutcome};
