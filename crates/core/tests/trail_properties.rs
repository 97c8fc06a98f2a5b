//! End-to-end trail properties across classification, building, formatting,
//! and both render projections.

use ace_breadcrumbs_core::{
    format_html, hint_matches, normalize_preview, sanitize_separator, AuthorEntry,
    BreadcrumbItem, BreadcrumbResolver, CrumbKind, DateParts, LocationDescriptor, PostEntry,
    PreviewContext, PreviewRenderer, QueryFlags, QueryKind, QueryState, RenderContext,
    RenderOptions, Scenario, SiteSnapshot, TermEntry,
};
use std::collections::BTreeMap;

fn page(id: u64, title: &str, parent: Option<u64>) -> PostEntry {
    PostEntry {
        id,
        post_type: "page".to_string(),
        title: title.to_string(),
        url: format!("/{}/", title.to_lowercase()),
        parent,
        terms: BTreeMap::new(),
        primary_terms: BTreeMap::new(),
    }
}

fn site() -> SiteSnapshot {
    SiteSnapshot::new("/")
        .with_post(page(1, "Company", None))
        .with_post(page(2, "About", Some(1)))
        .with_post(page(3, "Team", Some(2)))
        .with_post(page(4, "Contact", None))
        .with_term(TermEntry {
            id: 42,
            taxonomy: "post_tag".to_string(),
            name: "Coffee".to_string(),
            slug: "coffee".to_string(),
            url: "/tag/coffee/".to_string(),
            parent: None,
        })
        .with_author(AuthorEntry {
            id: 7,
            display_name: "Jane Doe".to_string(),
            url: "/author/jane/".to_string(),
        })
}

fn labels(items: &[BreadcrumbItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_str()).collect()
}

fn singular(post_id: u64) -> LocationDescriptor {
    let mut d = LocationDescriptor::authoritative(QueryKind::Singular);
    d.post_id = Some(post_id);
    d
}

#[test]
fn front_page_is_single_current_home() {
    let resolver = BreadcrumbResolver::new(site());
    let items = resolver.resolve(&LocationDescriptor::authoritative(QueryKind::FrontPage));

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "Home");
    assert!(items[0].is_current);
    assert!(items[0].url.is_empty());
}

#[test]
fn singular_page_has_ancestors_plus_two() {
    let resolver = BreadcrumbResolver::new(site());

    for (post_id, ancestors) in [(4, 0), (2, 1), (3, 2)] {
        let items = resolver.resolve(&singular(post_id));
        assert_eq!(items.len(), ancestors + 2, "page {}", post_id);
        assert!(items.last().is_some_and(|i| i.is_current));
    }

    let items = resolver.resolve(&singular(3));
    assert_eq!(labels(&items), vec!["Home", "Company", "About", "Team"]);
    assert_eq!(items[1].url, "/company/");
    assert_eq!(items[1].kind, CrumbKind::Ancestor);
}

#[test]
fn resolution_is_idempotent() {
    let resolver = BreadcrumbResolver::new(site());
    let descriptor = singular(3);
    assert_eq!(resolver.resolve(&descriptor), resolver.resolve(&descriptor.clone()));

    let preview = LocationDescriptor::default().with_hint("template", "search");
    assert_eq!(resolver.resolve(&preview), resolver.resolve(&preview));
}

#[test]
fn hiding_current_removes_exactly_one() {
    let resolver = BreadcrumbResolver::new(site());
    let options = RenderOptions::default().with_show_current(false);

    for descriptor in [
        singular(3),
        LocationDescriptor::authoritative(QueryKind::NotFound),
        LocationDescriptor::default(),
        LocationDescriptor::default().with_date(DateParts::year(2023)),
    ] {
        let full = resolver.resolve(&descriptor);
        let trimmed = resolver.resolve_with(&descriptor, &options);
        assert_eq!(trimmed.len(), full.len() - 1);
        assert!(trimmed.iter().all(|i| !i.is_current));
    }
}

#[test]
fn hiding_home_keeps_first_non_home_item() {
    let resolver = BreadcrumbResolver::new(site());
    let items = resolver.resolve_with(&singular(3), &RenderOptions::default().with_show_home(false));
    assert_eq!(labels(&items), vec!["Company", "About", "Team"]);
}

#[test]
fn separator_is_sanitized() {
    assert_eq!(sanitize_separator("   "), "/");
    assert_eq!(sanitize_separator("<span>»</span>"), "»");
    assert!(sanitize_separator("a very long separator").chars().count() <= 10);

    let html = format_html(
        &BreadcrumbResolver::new(site()).resolve(&singular(2)),
        &RenderOptions::default().with_separator("<b>|</b>"),
    );
    assert!(html.contains("aria-hidden=\"true\">|</span>"));
    assert!(!html.contains("<b>"));
}

#[test]
fn hint_keyword_matching() {
    assert!(hint_matches("category-archive", "category"));
    assert!(!hint_matches("archive", "category"));
    assert!(hint_matches("single-product", "product"));
}

#[test]
fn term_archive_end_to_end() {
    let resolver = BreadcrumbResolver::new(site());
    let descriptor = LocationDescriptor::authoritative(QueryKind::TermArchive).with_term(42, "post_tag");

    let items = resolver.resolve(&descriptor);
    assert_eq!(
        items,
        vec![
            BreadcrumbItem::link(CrumbKind::Home, "Home", "/"),
            BreadcrumbItem::current(CrumbKind::Term, "Coffee"),
        ]
    );
}

#[test]
fn year_archive_end_to_end() {
    let resolver = BreadcrumbResolver::new(site());
    let items = resolver.resolve(&LocationDescriptor::default().with_date(DateParts::year(2023)));

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].label, "Home");
    assert_eq!(items[1].label, "Year 2023");
    assert!(items[1].is_current);
    assert!(items[1].url.is_empty());
}

#[test]
fn search_label_is_stripped() {
    let resolver = BreadcrumbResolver::new(site());
    let descriptor = LocationDescriptor::authoritative(QueryKind::Search).with_search("wp<script>");

    let items = resolver.resolve(&descriptor);
    assert_eq!(items[1].label, "Search Results for \"wp\"");
    assert!(items[1].is_current);
}

#[test]
fn search_label_keeps_comparison_text() {
    let resolver = BreadcrumbResolver::new(site());
    let descriptor =
        LocationDescriptor::authoritative(QueryKind::Search).with_search("5 < 10 mugs");

    let items = resolver.resolve(&descriptor);
    assert_eq!(items[1].label, "Search Results for \"5 < 10 mugs\"");

    let html = format_html(&items, &RenderOptions::default());
    assert!(html.contains("5 &lt; 10 mugs"));
}

#[test]
fn empty_descriptor_resolves_to_current_home() {
    let resolver = BreadcrumbResolver::new(site());
    let items = resolver.resolve(&LocationDescriptor::default());
    assert_eq!(items, vec![BreadcrumbItem::current(CrumbKind::Home, "Home")]);
}

#[test]
fn authoritative_path_ignores_hints() {
    let resolver = BreadcrumbResolver::new(site());
    let descriptor = LocationDescriptor::authoritative(QueryKind::NotFound)
        .with_hint("template", "search")
        .with_hint("arg.s", "coffee");

    let trail = resolver.resolve_trail(&descriptor, &RenderOptions::default());
    assert_eq!(trail.scenario, Scenario::NotFound);
}

#[test]
fn author_archive_uses_display_name() {
    let resolver = BreadcrumbResolver::new(site());
    let context = RenderContext::live(QueryState {
        flags: QueryFlags {
            is_author: true,
            ..Default::default()
        },
        author_id: Some(7),
        ..Default::default()
    });

    let trail = resolver.resolve_context(&context, &RenderOptions::default());
    assert_eq!(trail.path(), "Home > Articles by Jane Doe");
}

#[test]
fn server_and_preview_markup_share_structure() {
    let options = RenderOptions::default().with_separator("›");
    let server_resolver = BreadcrumbResolver::new(site());
    let live = RenderContext::live(QueryState {
        flags: QueryFlags {
            is_search: true,
            ..Default::default()
        },
        search_term: Some("coffee".to_string()),
        ..Default::default()
    });
    let server = format_html(
        &server_resolver.resolve_context(&live, &options).items,
        &options,
    );

    let editor = PreviewContext {
        url_path: Some("/search/coffee/".to_string()),
        ..Default::default()
    };
    assert!(!normalize_preview(&editor).is_authoritative());
    let mut preview = PreviewRenderer::new(BreadcrumbResolver::new(site()), options);
    let markup = preview.render(&editor).to_string();

    assert_eq!(server, markup);
}
