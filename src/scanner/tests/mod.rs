//! Test modules for the scanner
//!
//! Collector and orchestrator suites share the scripted provider in
//! `helpers`.

mod helpers;
mod manager;
