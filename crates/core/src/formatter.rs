//! Item formatting
//!
//! Normalizes raw crumbs into their final shape: plain-text labels,
//! registered transformers applied, and the caller's home/current
//! visibility toggles honored.

use crate::config::RenderOptions;
use crate::models::{BreadcrumbItem, CrumbKind, LocationDescriptor};
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

fn script_style_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("static pattern")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // A tag opens with a name, a closing slash, or a comment/declaration/PI marker
    PATTERN.get_or_init(|| {
        Regex::new(r"<(?:/?[A-Za-z]|[!?])[^>]*(?:>|$)").expect("static pattern")
    })
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Remove all markup from a string.
///
/// Script and style elements are dropped together with their contents,
/// every other tag is removed, whitespace runs collapse to one space, and
/// the result is trimmed.
pub fn strip_tags(input: &str) -> String {
    if !input.contains('<') {
        return whitespace_pattern()
            .replace_all(input.trim(), " ")
            .into_owned();
    }
    let without_scripts = script_style_pattern().replace_all(input, "");
    let without_tags = tag_pattern().replace_all(&without_scripts, "");
    whitespace_pattern()
        .replace_all(without_tags.trim(), " ")
        .into_owned()
}

/// A transformer that may inject, remove, or relabel crumbs before render
pub trait TrailFilter: Send + Sync {
    fn apply(&self, items: Vec<BreadcrumbItem>, context: &LocationDescriptor) -> Vec<BreadcrumbItem>;
}

impl<F> TrailFilter for F
where
    F: Fn(Vec<BreadcrumbItem>, &LocationDescriptor) -> Vec<BreadcrumbItem> + Send + Sync,
{
    fn apply(&self, items: Vec<BreadcrumbItem>, context: &LocationDescriptor) -> Vec<BreadcrumbItem> {
        self(items, context)
    }
}

/// Applies sanitization, registered filters, and visibility toggles
pub struct ItemFormatter<'a> {
    filters: &'a [Box<dyn TrailFilter>],
}

impl<'a> ItemFormatter<'a> {
    pub fn new(filters: &'a [Box<dyn TrailFilter>]) -> Self {
        Self { filters }
    }

    /// Finalize a raw trail
    pub fn format(
        &self,
        raw: Vec<BreadcrumbItem>,
        context: &LocationDescriptor,
        options: &RenderOptions,
    ) -> Vec<BreadcrumbItem> {
        let mut items = sanitize(raw);

        if !self.filters.is_empty() {
            for (idx, filter) in self.filters.iter().enumerate() {
                items = filter.apply(items, context);
                trace!(filter = idx, items = items.len(), "applied trail filter");
            }
            // Filters may reintroduce markup or link the current item
            items = sanitize(items);
        }

        apply_visibility(items, options)
    }
}

/// Strip markup from labels and unlink current items
fn sanitize(items: Vec<BreadcrumbItem>) -> Vec<BreadcrumbItem> {
    items
        .into_iter()
        .map(|mut item| {
            item.label = strip_tags(&item.label);
            if item.is_current {
                item.url.clear();
            }
            item
        })
        .collect()
}

/// Honor `show_home` and `show_current`
pub fn apply_visibility(
    mut items: Vec<BreadcrumbItem>,
    options: &RenderOptions,
) -> Vec<BreadcrumbItem> {
    if !options.show_home && items.first().is_some_and(|i| i.kind == CrumbKind::Home) {
        items.remove(0);
    }
    if !options.show_current {
        if let Some(idx) = items.iter().rposition(|i| i.is_current) {
            items.remove(idx);
        }
    }
    items
}
