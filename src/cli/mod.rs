//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `scan`: Inventory module sources under one or more directories
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Scan the current directory
//! modsource scan
//!
//! # Scan several trees and keep going past broken files
//! modsource scan ./live ./modules --continue-on-error
//!
//! # Generate JSON report
//! modsource scan ./terraform --format json --output inventory.json
//!
//! # Initialize configuration
//! modsource init
//!
//! # Validate configuration
//! modsource validate modsource.yaml
//! ```

use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ModSource - where does every Terraform/OpenTofu module really come from.
#[derive(Parser, Debug)]
#[command(
    name = "modsource",
    author,
    version,
    about = "Terraform/OpenTofu module source inventory",
    long_about = "ModSource scans Terraform/OpenTofu configuration, extracts every module \
                  block and classifies its source as an SSH git repository, a local path, \
                  a registry entry or another remote protocol."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "MODSOURCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan directories for module declarations
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the scan command.
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Paths to scan (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print file and module counters after the report
    #[arg(long)]
    pub stats: bool,

    /// Additional directory names to skip
    #[arg(long = "extra-skip", value_name = "DIR")]
    pub extra_skip: Vec<String>,

    /// Patterns to exclude from scanning (glob patterns)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,

    /// Record failing files and keep scanning instead of aborting
    #[arg(long)]
    pub continue_on_error: bool,

    /// Process files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Maximum depth for recursive directory scanning
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl ScanArgs {
    /// The paths to scan, falling back to the current directory.
    #[must_use]
    pub fn scan_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "modsource.yaml")]
    pub config: PathBuf,
}
