//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{FileData, Module, Protocol, ScanResult};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to append the stats footer
    show_stats: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            show_stats: config.output.stats,
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, result: &ScanResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header());
        output.push('\n');

        output.push_str(&self.format_summary(result));
        output.push('\n');

        if !result.inventory.is_empty() {
            output.push_str(&self.format_modules(result));
            output.push('\n');
        }

        if result.has_failures() {
            output.push_str(&self.format_failures(result));
            output.push('\n');
        }

        if self.show_stats {
            output.push_str(&self.format_stats(result));
        }

        Ok(output)
    }
}

impl TextReporter {
    fn section_title(&self, title: &str) -> String {
        let title = if self.use_colors {
            title.bright_cyan().bold().to_string()
        } else {
            title.to_string()
        };
        format!("\n{title}\n{}\n", "-".repeat(80))
    }

    /// Format the report header.
    fn format_header(&self) -> String {
        let title = "ModSource Inventory";
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        if self.use_colors {
            format!(
                "\n{} {} {}\n{}\n",
                title.bright_white().bold(),
                version.dimmed(),
                format!("({timestamp})").dimmed(),
                "=".repeat(80).bright_blue(),
            )
        } else {
            format!("\n{title} {version} ({timestamp})\n{}\n", "=".repeat(80))
        }
    }

    /// Format the summary section.
    fn format_summary(&self, result: &ScanResult) -> String {
        let mut output = self.section_title("Summary");

        output.push_str(&format!(
            "  {} files scanned | {} with modules | {} modules\n",
            result.files_scanned.len(),
            result.inventory.files.len(),
            result.inventory.total_modules()
        ));

        let counts = result.inventory.protocol_counts();
        if !counts.is_empty() {
            let by_protocol = counts
                .iter()
                .map(|(protocol, count)| format!("{count} {protocol}"))
                .collect::<Vec<_>>()
                .join(" | ");
            output.push_str(&format!("  {by_protocol}\n"));
        }

        if result.has_failures() {
            let failed = format!("{} files failed", result.failures.len());
            if self.use_colors {
                output.push_str(&format!("  {}\n", failed.red().bold()));
            } else {
                output.push_str(&format!("  {failed}\n"));
            }
        }

        output
    }

    /// Format the modules table.
    fn format_modules(&self, result: &ScanResult) -> String {
        let mut output = self.section_title("Modules");

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["File", "Module", "Type", "Source", "Version", "Path"]);
        if !self.use_colors {
            // plain output never wraps to the terminal width
            table.force_no_tty();
        }

        for (file, module) in result.inventory.modules() {
            self.add_module_row(&mut table, file, module);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Add a module row to the table
    fn add_module_row(&self, table: &mut Table, file: &FileData, module: &Module) {
        let mut type_cell = Cell::new(module.protocol.as_str());
        if self.use_colors {
            type_cell = type_cell.fg(protocol_color(&module.protocol));
        }

        table.add_row(vec![
            Cell::new(file.path.display()),
            Cell::new(&module.name),
            type_cell,
            Cell::new(truncate(&module.resolved_source, 60)),
            Cell::new(&module.resolved_version),
            Cell::new(&module.resolved_path),
        ]);
    }

    /// Format the failures section.
    fn format_failures(&self, result: &ScanResult) -> String {
        let mut output = self.section_title("Failures");

        for failure in &result.failures {
            let path = failure.path.display().to_string();
            if self.use_colors {
                output.push_str(&format!("  {} {}\n", path.red(), failure.message.dimmed()));
            } else {
                output.push_str(&format!("  {path} {}\n", failure.message));
            }
        }

        output
    }

    /// Format the stats footer.
    fn format_stats(&self, result: &ScanResult) -> String {
        let took = format!("Took {}", result.stats.took());
        if self.use_colors {
            format!("\n{}\n{}\n", result.stats.summary().bold(), took.dimmed())
        } else {
            format!("\n{}\n{took}\n", result.stats.summary())
        }
    }
}

fn protocol_color(protocol: &Protocol) -> Color {
    match protocol {
        Protocol::Ssh => Color::Cyan,
        Protocol::File => Color::Green,
        Protocol::Registry => Color::Magenta,
        Protocol::Other(_) => Color::Yellow,
    }
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
