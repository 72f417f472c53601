//! HCL file parser implementation.
//!
//! This module provides file discovery and `module` block extraction using
//! the `hcl-rs` crate. Terraform JSON files are routed to [`super::json`].

use crate::config::Config;
use crate::error::{ModSourceError, Result};
use crate::parser::{json, ModuleBlock, ModuleEntry, Parser, SKIP_DIRS};

use hcl::expr::TemplateExpr;
use hcl::{Block, Body, Expression};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// HCL parser for Terraform/OpenTofu files.
///
/// The parser walks directories, reads `.tf` / `.tf.json` files, and extracts
/// their module blocks.
pub struct HclParser {
    /// Configuration for discovery behavior
    config: Config,
    /// Directory names never descended into
    skip_dirs: HashSet<String>,
    /// Compiled `scan.exclude_patterns`
    exclude: Vec<glob::Pattern>,
}

impl HclParser {
    /// Create a new HCL parser with the given configuration.
    ///
    /// Exclude patterns that are not valid globs are ignored with a warning.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let skip_dirs = SKIP_DIRS
            .iter()
            .map(|s| (*s).to_string())
            .chain(config.scan.extra_skip.iter().cloned())
            .collect();

        let exclude = config
            .scan
            .exclude_patterns
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();

        Self {
            config: config.clone(),
            skip_dirs,
            exclude,
        }
    }

    /// List every configuration file under `root`, in walk order.
    ///
    /// Entries are visited sorted by file name so repeated scans of the same
    /// tree discover files in the same order.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` doesn't exist.
    pub fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(crate::err!(DirectoryNotFound {
                path: root.to_path_buf(),
            }));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .max_depth(self.config.scan.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.should_skip(e.path(), root, e.file_type().is_dir()))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() || !self.is_terraform_file(entry.path()) {
                continue;
            }

            tracing::debug!(file = %entry.path().display(), "Discovered file");
            files.push(entry.into_path());
        }

        tracing::info!(root = %root.display(), files = files.len(), "Discovery complete");
        Ok(files)
    }

    /// Read a single file's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn read_file(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ModSourceError::io(path, e, file!(), line!()))
    }

    /// Check if a path should be skipped.
    fn should_skip(&self, path: &Path, root: &Path, is_dir: bool) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        if file_name.starts_with('.') {
            tracing::debug!(path = %path.display(), reason = "hidden file/directory", "Skipping path");
            return true;
        }

        if is_dir && self.skip_dirs.contains(file_name) {
            tracing::debug!(path = %path.display(), reason = "skip directory", "Skipping path");
            return true;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if self.exclude.iter().any(|p| p.matches_path(relative) || p.matches(file_name)) {
            tracing::debug!(path = %path.display(), reason = "matches exclude pattern", "Skipping path");
            return true;
        }

        false
    }

    /// Check if a file is a Terraform file.
    fn is_terraform_file(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.config
            .scan
            .extensions
            .iter()
            .any(|ext| path_str.ends_with(ext.as_str()))
    }
}

impl Parser for HclParser {
    fn parse_content(&self, content: &str, file_path: &Path) -> Result<Vec<ModuleBlock>> {
        if file_path.to_string_lossy().ends_with(".json") {
            return json::parse_modules(content, file_path);
        }

        let body: Body = hcl::from_str(content)
            .map_err(|e| ModSourceError::hcl_parse(file_path, e.to_string(), file!(), line!()))?;

        let blocks: Vec<ModuleBlock> = body
            .into_inner()
            .into_iter()
            .filter_map(|structure| match structure {
                hcl::Structure::Block(block) if block.identifier.as_str() == "module" => {
                    Some(parse_module_block(&block))
                }
                // Ignore other block types (resource, data, variable, etc.)
                _ => None,
            })
            .collect();

        tracing::debug!(file = %file_path.display(), modules = blocks.len(), "Parsed module blocks");
        Ok(blocks)
    }
}

/// Parse a module block into a `ModuleBlock`.
fn parse_module_block(block: &Block) -> ModuleBlock {
    let name = block
        .labels
        .first()
        .map_or_else(|| "unnamed".to_string(), |l| l.as_str().to_string());

    let source = get_string_attribute(&block.body, "source");
    if source.is_none() {
        tracing::warn!(module = %name, "Module block missing source attribute");
    }

    ModuleBlock {
        name,
        entries: vec![ModuleEntry {
            source: source.unwrap_or_default(),
            version: get_string_attribute(&block.body, "version").unwrap_or_default(),
        }],
    }
}

/// Get a string attribute from a body.
fn get_string_attribute(body: &Body, key: &str) -> Option<String> {
    body.attributes()
        .find(|attr| attr.key.as_str() == key)
        .and_then(|attr| expression_to_string(&attr.expr))
}

/// Convert an expression to a string if possible.
fn expression_to_string(expr: &Expression) -> Option<String> {
    match expr {
        Expression::String(s) => Some(s.clone()),
        Expression::Number(n) => Some(n.to_string()),
        Expression::Bool(b) => Some(b.to_string()),
        // Interpolations are kept verbatim, they are never evaluated
        Expression::TemplateExpr(t) => match t.as_ref() {
            TemplateExpr::QuotedString(s) => Some(s.clone()),
            TemplateExpr::Heredoc(h) => Some(h.template.clone()),
        },
        _ => None,
    }
}
