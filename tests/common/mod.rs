//! Common test utilities and helpers
//!
//! A scripted provider keyed by repository and endpoint plus builders for
//! raw records in the shape the provider API returns.

#![allow(dead_code)]

pub mod fixtures;
pub mod provider;
