//! # ModSource
//!
//! A Terraform/OpenTofu module source inventory.
//!
//! ModSource walks a directory tree, extracts every `module` block from the
//! configuration files it finds, and classifies each declared source by where
//! the module's code physically lives: a git repository reached over SSH, a
//! local path, a registry entry, or any other remote protocol.
//!
//! ## Features
//!
//! - **HCL and JSON parsing**: `.tf` files via `hcl-rs`, `.tf.json` via `serde_json`
//! - **Source classification**: git-transport style endpoint rules with
//!   owner/repository/ref/subpath decomposition for SSH sources
//! - **Deterministic output**: files and modules are reported in discovery and
//!   declaration order, even when files are processed in parallel
//! - **Failure policies**: abort on the first broken file or record it and go on
//! - **Multiple output formats**: plain text table and JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use modsource::{Scanner, Config, ReportFormat};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let scanner = Scanner::new(config);
//!
//!     // Scan a local directory
//!     let result = scanner.scan_path("./terraform").await?;
//!
//!     // Generate a report
//!     let report = result.generate_report(ReportFormat::Json)?;
//!     println!("{}", report);
//!
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod reporter;
pub mod resolver;
pub mod stats;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{ModSourceError, Result};
pub use resolver::{FileAggregator, ModuleClassifier};
pub use stats::{Stats, StatsReport};
pub use types::{
    FailurePolicy, FileData, FileFailure, GitLocation, Inventory, Module, Protocol, ReportFormat,
    ScanResult,
};

use error::ErrorCollector;
use parser::{HclParser, Parser};
use rayon::prelude::*;
use std::path::Path;

/// Main scanner orchestrator.
///
/// The `Scanner` is the primary entry point for using ModSource as a library.
/// For every scanned root it:
/// - discovers configuration files
/// - reads them concurrently
/// - parses and classifies each file, in parallel unless `scan.parallel` is off
/// - applies the configured [`FailurePolicy`]
///
/// # Example
///
/// ```rust,no_run
/// use modsource::{Scanner, Config};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = Config::default();
///     let scanner = Scanner::new(config);
///
///     // Scan multiple paths
///     let paths = vec!["./live", "./modules"];
///     let result = scanner.scan_paths(&paths).await?;
///
///     println!("Found {} modules", result.inventory.total_modules());
///     Ok(())
/// }
/// ```
pub struct Scanner {
    config: Config,
    parser: HclParser,
    classifier: ModuleClassifier,
}

impl Scanner {
    /// Create a new scanner with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let parser = HclParser::new(&config);
        Self {
            config,
            parser,
            classifier: ModuleClassifier::new(),
        }
    }

    /// Scan a single local path for Terraform/OpenTofu files.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path doesn't exist
    /// - Under `FailurePolicy::FailFast`, any file fails to read, parse or classify;
    ///   the error of the first such file in discovery order is returned
    pub async fn scan_path<P: AsRef<Path>>(&self, path: P) -> Result<ScanResult> {
        let root = path.as_ref();
        let policy = self.config.scan.failure_policy();
        tracing::info!(path = %root.display(), policy = ?policy, "Scanning path");

        let stats = Stats::new();
        let files = self.parser.discover_files(root)?;

        let contents =
            futures::future::join_all(files.iter().map(|file| self.parser.read_file(file))).await;

        let outcomes: Vec<Result<FileData>> = if self.config.scan.parallel {
            files
                .par_iter()
                .zip(contents.into_par_iter())
                .map(|(file, content)| self.process_file(file, content, &stats))
                .collect()
        } else {
            files
                .iter()
                .zip(contents)
                .map(|(file, content)| self.process_file(file, content, &stats))
                .collect()
        };

        let mut inventory = Inventory::default();
        let mut errors = ErrorCollector::new();
        for (file, outcome) in files.iter().zip(outcomes) {
            match outcome {
                Ok(data) => inventory.push(data),
                Err(e) if policy == FailurePolicy::ContinueOnError && e.is_recoverable() => {
                    tracing::warn!(file = %file.display(), error = %e, "Skipping file");
                    errors.add(file, e);
                }
                Err(e) => return Err(e),
            }
        }

        let failures = errors
            .iter()
            .map(|(path, e)| FileFailure {
                path: path.clone(),
                message: e.to_string(),
            })
            .collect();

        let stats = stats.stop();
        tracing::info!(
            path = %root.display(),
            files = stats.files,
            modules = stats.modules,
            failed = errors.count(),
            took = %stats.took(),
            "Scan complete"
        );

        Ok(ScanResult {
            inventory,
            failures,
            files_scanned: files,
            stats,
        })
    }

    /// Scan multiple local paths, merging the results in argument order.
    ///
    /// # Errors
    ///
    /// Returns an error if any path fails to scan.
    pub async fn scan_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ScanResult> {
        let mut merged = ScanResult::default();
        for path in paths {
            merged.merge(self.scan_path(path).await?);
        }
        Ok(merged)
    }

    /// Read, parse and classify one file.
    fn process_file(&self, path: &Path, content: Result<String>, stats: &Stats) -> Result<FileData> {
        let content = content?;
        let blocks = self.parser.parse_content(&content, path)?;
        FileAggregator::new(&self.classifier).aggregate(path, &blocks, stats)
    }
}
