//! Configuration file reading for Terraform/OpenTofu files.
//!
//! This module discovers configuration files under a directory tree and turns
//! their contents into the ordered list of `module` blocks they declare.
//!
//! # Supported Formats
//!
//! - `.tf` native HCL syntax, parsed with `hcl-rs`
//! - `.tf.json` Terraform JSON syntax, parsed with `serde_json`
//!
//! # Example
//!
//! ```rust,no_run
//! use modsource::parser::{HclParser, Parser};
//! use modsource::Config;
//! use std::path::Path;
//!
//! let parser = HclParser::new(&Config::default());
//! let blocks = parser.parse_content(r#"module "vpc" { source = "./vpc" }"#, Path::new("main.tf"))?;
//! assert_eq!(blocks[0].name, "vpc");
//! # Ok::<(), modsource::ModSourceError>(())
//! ```

mod hcl;
mod json;

pub use hcl::HclParser;

use serde::{Deserialize, Serialize};

/// File extensions scanned by default.
pub const TERRAFORM_EXTENSIONS: &[&str] = &[".tf", ".tf.json"];

/// Directories that are never descended into.
pub const SKIP_DIRS: &[&str] = &[".git", ".terraform", ".terragrunt-cache"];

/// The `source`/`version` pair of one module declaration, as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// The `source` attribute, empty when absent
    pub source: String,
    /// The `version` attribute, empty when absent
    pub version: String,
}

/// A named `module` block.
///
/// Terraform JSON allows a module name to map to a list of bodies, so a block
/// may carry more than one entry; only the first is ever classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBlock {
    /// The block label
    pub name: String,
    /// Bodies declared under the label, in file order
    pub entries: Vec<ModuleEntry>,
}

impl ModuleBlock {
    /// A block with a single body.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: vec![ModuleEntry {
                source: source.into(),
                version: version.into(),
            }],
        }
    }

    /// The body that gets classified.
    #[must_use]
    pub fn first_entry(&self) -> Option<&ModuleEntry> {
        self.entries.first()
    }
}

/// Trait for turning file contents into module blocks.
///
/// This trait allows for different parsing implementations
/// (e.g., for testing with mock parsers).
pub trait Parser: Send + Sync {
    /// Parse a single file's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid configuration.
    fn parse_content(&self, content: &str, file_path: &std::path::Path) -> crate::Result<Vec<ModuleBlock>>;
}
