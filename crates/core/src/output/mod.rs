//! Output formatting module
//!
//! This module provides the server HTML renderer, the editor preview
//! renderer, and JSON, YAML, ANSI, and summary projections of trails and
//! fixture reports.

pub mod ansi;
pub mod html;
mod json;
pub mod preview;
mod yaml;

pub use ansi::{format_items_ansi, format_report_ansi, format_trail_ansi};
pub use html::{escape_html, format_html, HtmlRenderer};
pub use json::format_json;
pub use preview::PreviewRenderer;
pub use yaml::format_yaml;

use crate::config::RenderOptions;
use crate::engine::FixtureReport;
use crate::models::ResolvedTrail;
use thiserror::Error;

/// Output format errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Formatting error: {0}")]
    FormattingError(String),
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format
    #[default]
    Json,
    /// YAML format
    Yaml,
    /// ANSI colored text
    Ansi,
    /// Breadcrumb markup
    Html,
    /// Plain text summary
    Summary,
}

/// Format a resolved trail in the specified format
pub fn format_trail(
    trail: &ResolvedTrail,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => format_json(trail),
        OutputFormat::Yaml => format_yaml(trail),
        OutputFormat::Ansi => Ok(format_trail_ansi(trail, &options.sanitized_separator())),
        OutputFormat::Html => Ok(format_html(&trail.items, options)),
        OutputFormat::Summary => Ok(format_trail_summary(trail, options)),
    }
}

/// Format a fixture report in the specified format
pub fn format_report(report: &FixtureReport, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => format_json(report),
        OutputFormat::Yaml => format_yaml(report),
        OutputFormat::Ansi => Ok(format_report_ansi(report)),
        OutputFormat::Html => Err(FormatError::FormattingError(
            "HTML output is only available for a single trail".to_string(),
        )),
        OutputFormat::Summary => Ok(format_report_summary(report)),
    }
}

/// Format a trail as plain text
fn format_trail_summary(trail: &ResolvedTrail, options: &RenderOptions) -> String {
    let separator = format!(" {} ", options.sanitized_separator());
    let path = trail
        .items
        .iter()
        .map(|i| i.label.as_str())
        .collect::<Vec<_>>()
        .join(&separator);

    let mut output = String::new();
    output.push_str(&format!("Scenario: {}\n", trail.scenario.label()));
    output.push_str(&format!("Items: {}\n", trail.items.len()));
    output.push_str(&format!("Trail: {}\n", path));
    if let Some(current) = trail.current() {
        output.push_str(&format!("Current: {}\n", current.label));
    }
    output
}

/// Format a fixture report as plain text
fn format_report_summary(report: &FixtureReport) -> String {
    let mut output = String::new();

    output.push_str("Breadcrumb Fixture Results\n");
    output.push_str("==========================\n\n");
    output.push_str(&format!("Root: {}\n", report.root.display()));
    output.push_str(&format!("Total Cases: {}\n", report.stats.total_cases));
    output.push_str(&format!("Passed: {}\n", report.stats.passed));
    output.push_str(&format!("Failed: {}\n", report.stats.failed));
    output.push_str(&format!(
        "Divergent Previews: {}\n",
        report.stats.divergent_previews
    ));

    let failed: Vec<_> = report.cases.iter().filter(|c| !c.passed).collect();
    if !failed.is_empty() {
        output.push_str("\nFailed Cases:\n");
        for case in failed {
            output.push_str(&format!("  {}: {}\n", case.name, case.server.path()));
        }
    }

    if report.stats.load_errors > 0 {
        output.push_str(&format!(
            "\nFiles that could not be loaded: {}\n",
            report.stats.load_errors
        ));
    }

    output.push_str(&format!("\nRun Duration: {}ms\n", report.metadata.duration_ms));
    output.push_str(&format!(
        "Processing Speed: {:.2} cases/sec\n",
        report.metadata.cases_per_second
    ));

    output
}
