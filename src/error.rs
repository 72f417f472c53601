//! Error types for ModSource.
//!
//! This module defines the error hierarchy using `thiserror`. Every variant
//! that is raised inside the crate records the source location it was raised
//! from, which the `err!` macro fills in automatically.
//!
//! # Error Categories
//!
//! - **IO errors**: unreadable files, missing scan roots
//! - **Parse errors**: files that are not valid HCL / JSON configuration
//! - **Classification errors**: module sources that are not a location of any
//!   recognised kind
//! - **Config errors**: invalid `modsource.yaml` files
//! - **Report errors**: rendering failures
//!
//! # Example
//!
//! ```rust
//! use modsource::error::{ModSourceError, Result};
//!
//! fn read(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .map_err(|e| ModSourceError::io(path, e, file!(), line!()))
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(ConfigValue { key: "scan.max_depth".to_string(), message: "must be > 0".into() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::ModSourceError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for ModSource operations.
pub type Result<T> = std::result::Result<T, ModSourceError>;

/// The main error type for ModSource.
#[derive(Error, Debug)]
pub enum ModSourceError {
    // =========================================================================
    // I/O and File System Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Directory not found.
    #[error("Directory not found: {path} ({src_path}:{src_line})")]
    DirectoryNotFound {
        /// The missing directory path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration File Parsing Errors
    // =========================================================================
    /// The file's bytes do not parse as valid HCL or Terraform JSON.
    #[error("Failed to parse '{file}' \n\t({src_path}:{src_line}): {message}")]
    HclParse {
        /// The file being parsed
        file: PathBuf,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Module Source Classification Errors
    // =========================================================================
    /// A module source is not a syntactically valid location reference.
    #[error("Module '{module}' has an invalid source '{module_source}' ({src_path}:{src_line}): {message}")]
    EndpointParse {
        /// The declared module name, or empty when classifying a bare source
        module: String,
        /// The source string that failed to classify
        module_source: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },
}

impl ModSourceError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error, src_path: &'static str, src_line: u32) -> Self {
        Self::Io { path: path.into(), source, src_path, src_line }
    }

    /// Creates an `HclParse` error.
    #[must_use]
    pub fn hcl_parse(file: impl Into<PathBuf>, message: String, src_path: &'static str, src_line: u32) -> Self {
        Self::HclParse { file: file.into(), message, src_path, src_line }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(message: String, source: Option<Box<dyn std::error::Error + Send + Sync>>, src_path: &'static str, src_line: u32) -> Self {
        Self::ConfigParse { message, source, src_path, src_line }
    }

    /// Attaches the declared module name to a classification error.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn for_module(self, name: &str) -> Self {
        match self {
            Self::EndpointParse { module_source, message, src_path, src_line, .. } => Self::EndpointParse {
                module: name.to_string(),
                module_source,
                message,
                src_path,
                src_line,
            },
            other => other,
        }
    }

    /// Determines if the error only concerns a single scanned file, so the
    /// scan may carry on with the remaining files.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::HclParse { .. } | Self::EndpointParse { .. }
        )
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => 13,
            Self::DirectoryNotFound { .. } => 15,
            Self::HclParse { .. } => 16,
            Self::EndpointParse { .. } => 17,
            Self::ConfigParse { .. } => 18,
            Self::ConfigValue { .. } => 19,
            _ => 1,
        }
    }
}

/// A utility for collecting multiple errors during scanning.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<(PathBuf, ModSourceError)>,
}

impl ErrorCollector {
    /// Create a new error collector.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error raised while processing `path`.
    pub fn add(&mut self, path: impl Into<PathBuf>, error: ModSourceError) {
        self.errors.push((path.into(), error));
    }

    /// Get the number of collected errors.
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are any errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the collected errors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &ModSourceError)> {
        self.errors.iter().map(|(path, error)| (path, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification_error() -> ModSourceError {
        crate::err!(EndpointParse {
            module: String::new(),
            module_source: "not a uri".to_string(),
            message: "contains whitespace".to_string(),
        })
    }

    #[test]
    fn test_for_module_names_the_module() {
        let error = classification_error().for_module("vpc");
        match error {
            ModSourceError::EndpointParse { module, module_source, .. } => {
                assert_eq!(module, "vpc");
                assert_eq!(module_source, "not a uri");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(classification_error().is_recoverable());
        assert!(ModSourceError::hcl_parse("main.tf", "bad".into(), file!(), line!()).is_recoverable());
        assert!(!crate::err!(DirectoryNotFound { path: PathBuf::from("/nope") }).is_recoverable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(classification_error().exit_code(), 17);
        assert_eq!(crate::err!(DirectoryNotFound { path: PathBuf::from("/nope") }).exit_code(), 15);
    }

    #[test]
    fn test_error_collector() {
        let mut collector = ErrorCollector::new();
        assert!(collector.is_empty());
        collector.add("a.tf", classification_error());
        assert_eq!(collector.count(), 1);
        assert_eq!(collector.iter().next().map(|(p, _)| p.clone()), Some(PathBuf::from("a.tf")));
        assert!(!collector.is_empty());
    }
}
