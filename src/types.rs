//! Core data types used throughout ModSource.
//!
//! This module defines the fundamental data structures for representing:
//! - Resolved module declarations and where their code lives
//! - Per-file and whole-run inventories
//! - Report formats and failure policies

use crate::stats::StatsReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Where a module's code physically lives.
///
/// `Ssh`, `File` and `Registry` get dedicated handling; any other protocol
/// tag reported by the endpoint classifier (`https`, `s3`, ...) is carried
/// through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    /// Remote version-control repository reached over SSH
    Ssh,
    /// Local filesystem path
    File,
    /// Named registry entry (a local-looking path with an explicit version)
    Registry,
    /// Any other protocol tag, kept as reported
    Other(String),
}

impl Protocol {
    /// The protocol tag as it appears in reports.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ssh => "ssh",
            Self::File => "file",
            Self::Registry => "registry",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for Protocol {
    fn from(tag: &str) -> Self {
        match tag {
            "ssh" => Self::Ssh,
            "file" => Self::File,
            "registry" => Self::Registry,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Protocol {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> Self {
        protocol.as_str().to_string()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote git reference decomposed into its parts.
///
/// # Example
///
/// `git@example.com:acme/widgets.git?ref=2.1.0//modules` decomposes into
/// owner `acme`, repository `widgets.git`, ref `2.1.0` and subpath `modules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLocation {
    /// Repository owner (user or organisation)
    pub owner: String,
    /// Repository name, including the `.git` suffix
    pub repository: String,
    /// Version tag, branch name or semver-like string; empty when absent
    #[serde(rename = "ref")]
    pub ref_: String,
    /// Path inside the repository; empty when absent
    pub subpath: String,
}

impl GitLocation {
    /// True when nothing in the input matched the git location pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty() && self.repository.is_empty() && self.ref_.is_empty() && self.subpath.is_empty()
    }
}

/// One resolved module declaration: the provenance record.
///
/// # Example HCL
///
/// ```hcl
/// module "network" {
///   source = "git@github.com:acme/network.git?ref=1.2.0//vpc"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// The block label (e.g. "network")
    pub name: String,

    /// The `source` attribute as written
    pub declared_source: String,

    /// The `version` attribute as written, empty when absent
    pub declared_version: String,

    /// Where the module lives
    pub protocol: Protocol,

    /// The repository name for `ssh`, otherwise the declared source
    #[serde(rename = "source")]
    pub resolved_source: String,

    /// The decomposed ref for `ssh`, otherwise the declared version
    #[serde(rename = "version")]
    pub resolved_version: String,

    /// Subpath for `ssh`, endpoint path for everything else
    #[serde(rename = "path")]
    pub resolved_path: String,

    /// Decomposed git location, only for `ssh` modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitLocation>,
}

/// One scanned configuration file and the modules it declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    /// Base file name (e.g. "main.tf")
    pub name: String,

    /// Full path as discovered
    pub path: PathBuf,

    /// Modules in block declaration order
    pub modules: Vec<Module>,
}

/// Every file that declared at least one module, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    /// The files
    pub files: Vec<FileData>,
}

impl Inventory {
    /// Append a file, dropping it when it declares no modules.
    pub fn push(&mut self, file: FileData) {
        if file.modules.is_empty() {
            tracing::debug!(file = %file.path.display(), "No modules declared, leaving file out of the inventory");
        } else {
            self.files.push(file);
        }
    }

    /// Iterate over `(file, module)` pairs in inventory order.
    pub fn modules(&self) -> impl Iterator<Item = (&FileData, &Module)> {
        self.files
            .iter()
            .flat_map(|file| file.modules.iter().map(move |module| (file, module)))
    }

    /// Total number of modules across all files.
    #[must_use]
    pub fn total_modules(&self) -> usize {
        self.files.iter().map(|f| f.modules.len()).sum()
    }

    /// Number of modules per protocol tag.
    #[must_use]
    pub fn protocol_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for (_, module) in self.modules() {
            *counts.entry(module.protocol.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// True when no file declared a module.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A file left out of the inventory because processing it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// The file that failed
    pub path: PathBuf,
    /// Human readable reason
    pub message: String,
}

/// What the scanner does when a single file fails to parse or classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the run with the first failure in discovery order
    #[default]
    FailFast,
    /// Record the failure, drop the file and carry on
    ContinueOnError,
}

/// Result of scanning a directory tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Files with at least one module
    pub inventory: Inventory,

    /// Files that were dropped under `FailurePolicy::ContinueOnError`
    pub failures: Vec<FileFailure>,

    /// Every configuration file that was discovered
    pub files_scanned: Vec<PathBuf>,

    /// Finalized counters for the run
    pub stats: StatsReport,
}

impl ScanResult {
    /// Merge another scan result into this one.
    pub fn merge(&mut self, other: Self) {
        self.inventory.files.extend(other.inventory.files);
        self.failures.extend(other.failures);
        self.files_scanned.extend(other.files_scanned);
        self.stats.merge(&other.stats);
    }

    /// True when some files were dropped because they failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Generate a report in the specified format with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate_report(&self, format: ReportFormat) -> crate::Result<String> {
        let config = crate::Config::default();
        let reporter = crate::reporter::Reporter::new(&config);
        reporter.generate(self, format)
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// Table for terminals
    #[default]
    Text,
    /// JSON format
    Json,
}
