//! Configuration module for ModSource.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`modsource.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # modsource.yaml
//!
//! # Scanning options
//! scan:
//!   extra_skip:
//!     - vendor
//!   exclude_patterns:
//!     - "**/examples/**"
//!   extensions: [".tf", ".tf.json"]
//!   max_depth: 100
//!   continue_on_error: false
//!   parallel: true
//!
//! # Output options
//! output:
//!   colored: true
//!   pretty: true
//!   stats: false
//! ```

use crate::error::{ModSourceError, Result};
use crate::parser::TERRAFORM_EXTENSIONS;
use crate::types::FailurePolicy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BRACED_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

static BARE_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex"));

/// Scanning options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Directory names to skip in addition to `.git`, `.terraform` and `.terragrunt-cache`.
    pub extra_skip: Vec<String>,

    /// Patterns to exclude from scanning (glob patterns, relative to the scan root).
    pub exclude_patterns: Vec<String>,

    /// File name suffixes that mark configuration files.
    pub extensions: Vec<String>,

    /// Maximum depth for recursive directory scanning.
    pub max_depth: usize,

    /// Continue scanning even if some files fail to parse or classify.
    pub continue_on_error: bool,

    /// Process files on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extra_skip: Vec::new(),
            exclude_patterns: Vec::new(),
            extensions: TERRAFORM_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            max_depth: 100,
            continue_on_error: false,
            parallel: true,
        }
    }
}

impl ScanOptions {
    /// The failure policy these options select.
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        if self.continue_on_error {
            FailurePolicy::ContinueOnError
        } else {
            FailurePolicy::FailFast
        }
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    pub colored: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Include run statistics in reports.
    pub stats: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            pretty: true,
            stats: false,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanning options
    pub scan: ScanOptions,

    /// Output options
    pub output: OutputOptions,
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value is out of range.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Self = serde_yaml::from_str(&expanded)
            .map_err(|e| ModSourceError::config_parse(e.to_string(), Some(Box::new(e)), file!(), line!()))?;
        config.validate()?;

        tracing::debug!(
            extra_skip = config.scan.extra_skip.len(),
            exclude_patterns = config.scan.exclude_patterns.len(),
            continue_on_error = config.scan.continue_on_error,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.scan.max_depth == 0 {
            return Err(crate::err!(ConfigValue {
                key: "scan.max_depth".to_string(),
                message: "must be at least 1".to_string(),
            }));
        }
        if self.scan.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(crate::err!(ConfigValue {
                key: "scan.extensions".to_string(),
                message: "at least one extension is required".to_string(),
            }));
        }
        if let Some((pattern, e)) = self
            .scan
            .exclude_patterns
            .iter()
            .find_map(|p| glob::Pattern::new(p).err().map(|e| (p, e)))
        {
            return Err(crate::err!(ConfigValue {
                key: "scan.exclude_patterns".to_string(),
                message: format!("'{pattern}' is not a valid glob: {e}"),
            }));
        }
        Ok(())
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# ModSource Configuration File

# Scanning options
scan:
  # Directory names to skip, on top of .git, .terraform and .terragrunt-cache
  extra_skip: []
  #   - vendor

  # Patterns to exclude from scanning (glob patterns, relative to the scan root)
  exclude_patterns: []
  #   - "**/examples/**"

  # File name suffixes to scan
  extensions:
    - ".tf"
    - ".tf.json"

  # Maximum depth for recursive directory scanning
  max_depth: 100

  # Keep going when a file fails to parse or declares an invalid source
  continue_on_error: false

  # Process files in parallel
  parallel: true

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Pretty-print JSON output
  pretty: true

  # Print file and module counters after the report
  stats: false
"#
        .to_string()
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::ScanArgs) {
        self.scan.extra_skip.extend(args.extra_skip.iter().cloned());
        self.scan
            .exclude_patterns
            .extend(args.exclude_patterns.iter().cloned());
        if args.continue_on_error {
            self.scan.continue_on_error = true;
        }
        if args.sequential {
            self.scan.parallel = false;
        }
        if let Some(max_depth) = args.max_depth {
            self.scan.max_depth = max_depth;
        }
        if args.stats {
            self.output.stats = true;
        }
        if args.no_color {
            self.output.colored = false;
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unknown variables are left as written.
fn expand_env_vars(content: &str) -> String {
    let braced = BRACED_VAR_PATTERN.replace_all(content, |caps: &regex::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    BARE_VAR_PATTERN
        .replace_all(&braced, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.max_depth, 100);
        assert_eq!(config.scan.extensions, vec![".tf", ".tf.json"]);
        assert!(config.scan.parallel);
        assert_eq!(config.scan.failure_policy(), FailurePolicy::FailFast);
        assert!(config.output.pretty);
        assert!(!config.output.stats);
    }

    #[test]
    fn test_config_from_yaml_nested() {
        let yaml = r#"
scan:
  extra_skip:
    - vendor
  exclude_patterns:
    - "**/examples/**"
  continue_on_error: true
  max_depth: 5
output:
  colored: false
"#;

        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.scan.extra_skip, vec!["vendor"]);
        assert!(config.scan.exclude_patterns.contains(&"**/examples/**".to_string()));
        assert_eq!(config.scan.failure_policy(), FailurePolicy::ContinueOnError);
        assert_eq!(config.scan.max_depth, 5);
        assert!(!config.output.colored);
        // untouched keys keep their defaults
        assert_eq!(config.scan.extensions, vec![".tf", ".tf.json"]);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.scan.max_depth, 100);
        assert!(config.scan.parallel);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_yaml("scan:\n  max_depth: 0\n"),
            Err(ModSourceError::ConfigValue { .. })
        ));
        assert!(matches!(
            Config::from_yaml("scan:\n  extensions: []\n"),
            Err(ModSourceError::ConfigValue { .. })
        ));
        assert!(matches!(
            Config::from_yaml("scan:\n  exclude_patterns: ['[']\n"),
            Err(ModSourceError::ConfigValue { .. })
        ));
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        assert!(matches!(
            Config::from_yaml("scan: [unclosed"),
            Err(ModSourceError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_env_var_expansion_keeps_unknown_variables() {
        let content = "skip: ${MODSOURCE_TEST_SURELY_UNSET_VAR} and $MODSOURCE_OTHER_UNSET";
        assert_eq!(expand_env_vars(content), content);
        assert_eq!(expand_env_vars("no vars here"), "no vars here");
    }

    #[test]
    fn test_env_var_expansion_uses_environment() {
        // PATH is set in any environment the tests run in
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_env_vars("${PATH}"), path);
        assert_eq!(expand_env_vars("$PATH"), path);
    }

    #[test]
    fn test_merge_cli_args() {
        let mut config = Config::from_yaml("scan:\n  extra_skip: [vendor]\n").unwrap();
        let args = crate::cli::ScanArgs {
            extra_skip: vec!["build".to_string()],
            continue_on_error: true,
            sequential: true,
            max_depth: Some(4),
            stats: true,
            ..crate::cli::ScanArgs::default()
        };

        config.merge_cli_args(&args);
        assert_eq!(config.scan.extra_skip, vec!["vendor", "build"]);
        assert_eq!(config.scan.failure_policy(), FailurePolicy::ContinueOnError);
        assert!(!config.scan.parallel);
        assert_eq!(config.scan.max_depth, 4);
        assert!(config.output.stats);
        assert!(config.output.colored);
    }

    #[test]
    fn test_example_yaml_is_valid() {
        let config = Config::from_yaml(&Config::example_yaml()).unwrap();
        assert_eq!(config.scan.max_depth, 100);
    }
}
