//! ANSI colored output formatter
//!
//! This module provides colorful terminal output for trails and fixture
//! reports.

use crate::engine::{CaseOutcome, FixtureReport};
use crate::models::{BreadcrumbItem, CrumbKind, ResolvedTrail};
use colored::{ColoredString, Colorize};

/// Get color for crumb kind
fn crumb_color(item: &BreadcrumbItem) -> ColoredString {
    let label = item.label.as_str();
    let styled = match item.kind {
        CrumbKind::Home => label.bright_white(),
        CrumbKind::BlogIndex | CrumbKind::PostTypeArchive => label.bright_blue(),
        CrumbKind::Taxonomy => label.blue(),
        CrumbKind::Term => label.bright_green(),
        CrumbKind::Ancestor => label.cyan(),
        CrumbKind::Entry => label.bright_yellow(),
        CrumbKind::Search => label.bright_magenta(),
        CrumbKind::Author => label.magenta(),
        CrumbKind::Date => label.yellow(),
        CrumbKind::NotFound => label.bright_red(),
        CrumbKind::Placeholder => label.dimmed(),
    };
    if item.is_current {
        styled.bold()
    } else {
        styled
    }
}

/// Format a trail as a single colored line
pub fn format_items_ansi(items: &[BreadcrumbItem], separator: &str) -> String {
    if items.is_empty() {
        return "(no trail)".dimmed().to_string();
    }

    items
        .iter()
        .map(|item| crumb_color(item).to_string())
        .collect::<Vec<_>>()
        .join(&format!(" {} ", separator.dimmed()))
}

/// Format a resolved trail with its scenario and link targets
pub fn format_trail_ansi(trail: &ResolvedTrail, separator: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n",
        "Scenario:".bold(),
        trail.scenario.label().bright_cyan()
    ));
    output.push_str(&format_items_ansi(&trail.items, separator));
    output.push('\n');

    for (idx, item) in trail.items.iter().enumerate() {
        let target = if item.is_current {
            "(current)".dimmed().to_string()
        } else if item.url.is_empty() {
            "(no link)".dimmed().to_string()
        } else {
            item.url.underline().to_string()
        };
        output.push_str(&format!("  {}. {} {}\n", idx + 1, crumb_color(item), target));
    }

    output
}

/// Format a fixture report as ANSI colored text
pub fn format_report_ansi(report: &FixtureReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{}\n\n",
        "  Breadcrumb Fixture Results  ".bold().on_blue()
    ));
    output.push_str(&format!("{} {}\n\n", "Root:".bold(), report.root.display()));

    for case in &report.cases {
        output.push_str(&format_case_ansi(case));
    }

    for error in &report.errors {
        output.push_str(&format!("{} {}\n", "ERROR".bright_red().bold(), error));
    }

    output.push_str(&format!(
        "\n{} {}  {} {}  {} {}  {} {}\n",
        "Cases:".bold(),
        report.stats.total_cases,
        "Passed:".bold(),
        report.stats.passed.to_string().green(),
        "Failed:".bold(),
        if report.stats.failed > 0 {
            report.stats.failed.to_string().red()
        } else {
            report.stats.failed.to_string().normal()
        },
        "Divergent previews:".bold(),
        report.stats.divergent_previews
    ));
    output.push_str(&format!(
        "{}\n",
        format!(
            "Completed in {}ms ({:.2} cases/sec)",
            report.metadata.duration_ms, report.metadata.cases_per_second
        )
        .dimmed()
    ));

    output
}

fn format_case_ansi(case: &CaseOutcome) -> String {
    let status = if case.passed {
        "PASS".bright_green().bold()
    } else {
        "FAIL".bright_red().bold()
    };
    let mut output = format!("{} {}\n", status, case.name.bold());
    output.push_str(&format!(
        "   {} {}\n",
        "server ".dimmed(),
        format_items_ansi(&case.server.items, ">")
    ));
    let marker = if case.same_shape {
        "preview".dimmed()
    } else {
        "preview".yellow()
    };
    output.push_str(&format!(
        "   {} {}\n",
        marker,
        format_items_ansi(&case.preview.items, ">")
    ));
    output
}
