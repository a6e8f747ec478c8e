//! Compliance domain: event model, scoring rules and normalization
//!
//! Raw provider records flow through [`normalizer::EventNormalizer`], which
//! decodes them, applies the matching rule from [`scoring`] and produces
//! immutable [`event::ComplianceEvent`] values.

pub mod event;
pub mod normalizer;
pub mod scoring;

pub use event::{ComplianceEvent, EventDetails, EventType};
pub use normalizer::{EventNormalizer, MalformedRecord, RecordKind};
