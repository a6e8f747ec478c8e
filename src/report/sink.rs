//! Report Sinks
//!
//! Persist an assembled report as pretty-printed JSON, either to a file or to
//! standard output.

use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;

use crate::report::assembler::Report;
use crate::report::error::{ReportError, ReportResult};

/// Output value that selects [`StdoutSink`]
pub const STDOUT_OUTPUT: &str = "-";
pub const DEFAULT_OUTPUT: &str = "compliance_report.json";

/// Report serialization used by every sink (two-space indentation)
pub fn to_pretty_json(report: &Report) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn write(&self, report: &Report) -> ReportResult<()>;

    /// Where the report goes, for log messages
    fn destination(&self) -> String;
}

pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportSink for JsonFileSink {
    async fn write(&self, report: &Report) -> ReportResult<()> {
        let json = to_pretty_json(report)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| ReportError::Io {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
pub struct StdoutSink;

#[async_trait]
impl ReportSink for StdoutSink {
    async fn write(&self, report: &Report) -> ReportResult<()> {
        let json = to_pretty_json(report)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", json)
            .and_then(|_| stdout.flush())
            .map_err(|e| ReportError::Io {
                path: "stdout".to_string(),
                message: e.to_string(),
            })
    }

    fn destination(&self) -> String {
        "stdout".to_string()
    }
}

/// Sink for an `--output` value
pub fn sink_for_output(output: &str) -> Box<dyn ReportSink> {
    if output == STDOUT_OUTPUT {
        Box::new(StdoutSink)
    } else {
        Box::new(JsonFileSink::new(output))
    }
}
