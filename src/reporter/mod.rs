//! Report generation module.
//!
//! This module renders a [`ScanResult`] in multiple formats:
//! - JSON: Machine-readable structured output
//! - Text: Human-readable CLI table
//!
//! # Example
//!
//! ```rust,no_run
//! use modsource::reporter::Reporter;
//! use modsource::{Config, ReportFormat, Scanner};
//!
//! # async fn run() -> modsource::Result<()> {
//! let config = Config::default();
//! let result = Scanner::new(config.clone()).scan_path("./terraform").await?;
//!
//! let reporter = Reporter::new(&config);
//! let json = reporter.generate(&result, ReportFormat::Json)?;
//! let text = reporter.generate(&result, ReportFormat::Text)?;
//! # Ok(())
//! # }
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{ReportFormat, ScanResult};

pub use json::{JsonReport, JsonReporter};
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, result: &ScanResult, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(result),
            ReportFormat::Text => TextReporter::new(&self.config).generate(result),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from scan results.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, result: &ScanResult) -> Result<String>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_dispatches_on_format() {
        let mut config = Config::default();
        config.output.colored = false;
        let reporter = Reporter::new(&config);
        let result = fixtures::scan_result();

        let json = reporter.generate(&result, ReportFormat::Json).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());

        let text = reporter.generate(&result, ReportFormat::Text).unwrap();
        assert!(text.contains("widgets.git"));
    }
}
