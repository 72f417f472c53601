//! ModSource CLI entry point.
//!
//! This binary provides the command-line interface for ModSource.

use clap::Parser;
use modsource::cli::{Cli, Commands};
use modsource::{Config, ModSourceError, Scanner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Config file names looked up in the working directory.
const DEFAULT_CONFIG_FILES: &[&str] = &["modsource.yaml", "modsource.yml", ".modsource.yaml"];

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            eprintln!("Error: {e}");

            // Print error chain (cause chain)
            let mut chain = e.chain().skip(1).peekable();
            if chain.peek().is_some() {
                eprintln!("\nCaused by:");
                for (i, cause) in chain.enumerate() {
                    eprintln!("  {i}: {cause}");
                }
            }

            let code = e
                .downcast_ref::<ModSourceError>()
                .map_or(1, ModSourceError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // RUST_LOG wins over the verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            // modsource at the requested level, everything else at warn
            EnvFilter::new(format!("warn,modsource={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Scan(args) => {
            tracing::debug!("Loading configuration");
            let mut config = load_config(cli.config.as_deref())?;
            config.merge_cli_args(&args);
            config.validate()?;

            if !config.output.colored {
                colored::control::set_override(false);
            }

            let scanner = Scanner::new(config.clone());
            let paths = args.scan_paths();
            let result = scanner.scan_paths(&paths).await?;

            let reporter = modsource::reporter::Reporter::new(&config);
            let report = reporter.generate(&result, args.format)?;

            if let Some(output_path) = args.output {
                std::fs::write(&output_path, &report)?;
                tracing::info!(path = %output_path.display(), "Report written");
            } else {
                println!("{report}");
            }

            // Failures only survive the scan under continue_on_error
            let exit_code = if result.has_failures() { 2 } else { 0 };
            Ok(ExitCode::from(exit_code))
        }

        Commands::Init => {
            let config_path = Path::new(DEFAULT_CONFIG_FILES[0]);
            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml())?;
            println!("Created example configuration: {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate(args) => {
            let config_content = std::fs::read_to_string(&args.config)?;
            match Config::from_yaml(&config_content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.config.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

/// Resolve and load the configuration.
///
/// Lookup order: explicit `--config` / `MODSOURCE_CONFIG`, then the working
/// directory, then `<config dir>/modsource/config.yaml`, then defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(config_path) = explicit {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        return read_config(config_path);
    }

    let candidates = DEFAULT_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .chain(dirs::config_dir().map(|dir| dir.join("modsource").join("config.yaml")));

    for path in candidates {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Found configuration file");
            return read_config(&path);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ModSourceError::io(path, e, file!(), line!()))?;
    Ok(Config::from_yaml(&content)?)
}
