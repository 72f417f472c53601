//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::stats::StatsReport;
use crate::types::{FileData, FileFailure, ScanResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
    /// Whether to include run statistics
    stats: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
            stats: config.output.stats,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, result: &ScanResult) -> Result<String> {
        let mut report = JsonReport::from(result);
        if !self.stats {
            report.stats = None;
        }

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };

        json.map_err(|e| crate::err!(ReportGeneration {
            message: format!("Failed to serialize JSON report: {e}"),
        }))
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: ReportSummary,
    /// Files with their resolved modules, in discovery order
    pub files: &'a [FileData],
    /// Files left out because they failed
    pub failures: &'a [FileFailure],
    /// Run counters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<&'a StatsReport>,
}

impl<'a> From<&'a ScanResult> for JsonReport<'a> {
    fn from(result: &'a ScanResult) -> Self {
        Self {
            metadata: ReportMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
            summary: ReportSummary {
                files_scanned: result.files_scanned.len(),
                files_with_modules: result.inventory.files.len(),
                total_modules: result.inventory.total_modules(),
                by_protocol: result.inventory.protocol_counts(),
            },
            files: &result.inventory.files,
            failures: &result.failures,
            stats: Some(&result.stats),
        }
    }
}

/// Report metadata.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// ModSource version
    pub version: String,
    /// Report generation timestamp
    pub timestamp: String,
}

/// Report summary.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    /// Configuration files discovered
    pub files_scanned: usize,
    /// Files that declared at least one module
    pub files_with_modules: usize,
    /// Total modules found
    pub total_modules: usize,
    /// Modules grouped by protocol
    pub by_protocol: BTreeMap<String, usize>,
}
