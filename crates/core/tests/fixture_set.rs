//! Runs the shared fixture set through both the server and preview paths.

use ace_breadcrumbs_core::{format_report, FixtureCase, FixtureRunner, OutputFormat};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
}

#[test]
fn shared_fixtures_pass() {
    let report = FixtureRunner::new(fixtures_dir()).run().unwrap();

    let failed: Vec<_> = report
        .cases
        .iter()
        .filter(|c| !c.passed)
        .map(|c| format!("{}: {} | {}", c.name, c.server.path(), c.preview.path()))
        .collect();
    assert!(failed.is_empty(), "failed cases: {:?}", failed);
    assert!(report.errors.is_empty(), "load errors: {:?}", report.errors);
    assert_eq!(report.stats.total_cases, 5);
    assert!(report.all_passed());
}

#[test]
fn previews_stay_structurally_analogous() {
    let report = FixtureRunner::new(fixtures_dir())
        .with_threads(1)
        .run()
        .unwrap();

    assert_eq!(report.stats.divergent_previews, 0);
    for case in &report.cases {
        assert_eq!(case.server.items.len(), case.preview.items.len(), "{}", case.name);
    }
}

#[test]
fn preview_may_differ_in_content() {
    let case = FixtureCase::load(&fixtures_dir().join("search_divergent.toml")).unwrap();
    let outcome = case.run();

    assert!(outcome.passed);
    assert!(outcome.same_shape);
    assert_ne!(outcome.server.items, outcome.preview.items);
}

#[test]
fn report_summary_lists_totals() {
    let report = FixtureRunner::new(fixtures_dir()).run().unwrap();
    let summary = format_report(&report, OutputFormat::Summary).unwrap();

    assert!(summary.contains("Total Cases: 5"));
    assert!(summary.contains("Failed: 0"));
    assert!(!summary.contains("Failed Cases:"));
}
