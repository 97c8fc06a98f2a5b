//! ace_breadcrumbs_core - Core library for breadcrumb trail resolution
//!
//! This crate answers "where am I in the site hierarchy" for a page being
//! rendered and produces an ordered trail of labeled, linked crumbs.
//!
//! # Features
//!
//! - **Two input modes**: authoritative live query state, or an incomplete
//!   editor preview context classified by keyword heuristics.
//! - **Single decision table**: every render path shares one
//!   [`Scenario`] classification and one trail builder.
//! - **Pluggable site data**: titles, URLs, and parent links come through
//!   the [`SiteGraph`] trait; [`SiteSnapshot`] is an in-memory implementation.
//! - **Multiple Output Formats**: schema.org HTML markup, JSON, YAML, and
//!   ANSI-colored terminal output.
//!
//! # Example
//!
//! ```rust
//! use ace_breadcrumbs_core::{
//!     format_html, BreadcrumbResolver, DateParts, LocationDescriptor, RenderOptions,
//!     SiteSnapshot,
//! };
//!
//! let resolver = BreadcrumbResolver::new(SiteSnapshot::default());
//! let descriptor = LocationDescriptor::default().with_date(DateParts::year(2023));
//!
//! let items = resolver.resolve(&descriptor);
//! assert_eq!(items[1].label, "Year 2023");
//!
//! let html = format_html(&items, &RenderOptions::default());
//! assert!(html.contains("aria-current=\"page\""));
//! ```

pub mod classifier;
pub mod config;
pub mod context;
pub mod engine;
pub mod formatter;
pub mod models;
pub mod output;
pub mod site;
pub mod trail;

// Re-exports for convenience
pub use classifier::{classify, hint_matches};
pub use config::{sanitize_separator, ConfigError, RenderOptions, TrailLabels};
pub use context::{
    normalize, normalize_preview, normalize_query, PreviewContext, QueryContext, QueryFlags,
    QueryState, RenderContext,
};
pub use engine::{
    BreadcrumbResolver, CaseOutcome, FixtureCase, FixtureError, FixtureReport, FixtureRunner,
    FixtureStats, RunMetadata,
};
pub use formatter::{strip_tags, ItemFormatter, TrailFilter};
pub use models::{
    AuthorRef, BreadcrumbItem, CrumbKind, DateParts, EntityRef, LocationDescriptor,
    PostTypeInfo, QueryKind, QueryTerms, ResolvedTrail, Scenario, TaxonomyInfo, TermHint,
    TermTarget,
};
pub use output::{
    format_html, format_report, format_trail, FormatError, HtmlRenderer, OutputFormat,
    PreviewRenderer,
};
pub use site::{AuthorEntry, PostEntry, SiteGraph, SiteSnapshot, TermEntry};
pub use trail::TrailBuilder;
