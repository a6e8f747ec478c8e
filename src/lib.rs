pub mod app;
pub mod compliance;
pub mod core;
pub mod provider;
pub mod report;
pub mod scanner;
