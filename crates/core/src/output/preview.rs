//! Editor preview renderer
//!
//! Previews never see authoritative query state, so every render goes
//! through the heuristic classification path. The last result is memoized
//! against the normalized descriptor: re-rendering with a context that
//! normalizes to the same descriptor reuses the cached markup.

use crate::config::RenderOptions;
use crate::context::{normalize_preview, PreviewContext};
use crate::engine::BreadcrumbResolver;
use crate::models::{BreadcrumbItem, CrumbKind, LocationDescriptor, ResolvedTrail};
use crate::output::html::HtmlRenderer;
use crate::site::SiteGraph;
use tracing::trace;

struct Memo {
    descriptor: LocationDescriptor,
    trail: ResolvedTrail,
    html: String,
}

/// Reactive preview renderer over a site collaborator
pub struct PreviewRenderer<S: SiteGraph> {
    resolver: BreadcrumbResolver<S>,
    options: RenderOptions,
    memo: Option<Memo>,
}

impl<S: SiteGraph> PreviewRenderer<S> {
    pub fn new(resolver: BreadcrumbResolver<S>, options: RenderOptions) -> Self {
        Self {
            resolver,
            options,
            memo: None,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Replace the render options; the memo is dropped
    pub fn set_options(&mut self, options: RenderOptions) {
        if options != self.options {
            self.options = options;
            self.memo = None;
        }
    }

    /// Render markup for the given editor context
    pub fn render(&mut self, context: &PreviewContext) -> &str {
        &self.refresh(context).html
    }

    /// Resolved trail for the given editor context
    pub fn trail(&mut self, context: &PreviewContext) -> &ResolvedTrail {
        &self.refresh(context).trail
    }

    fn refresh(&mut self, context: &PreviewContext) -> &Memo {
        let descriptor = normalize_preview(context);

        match self.memo.take() {
            Some(memo) if memo.descriptor == descriptor => {
                trace!("preview context unchanged, reusing memoized trail");
                self.memo.insert(memo)
            }
            _ => {
                let mut trail = self.resolver.resolve_trail(&descriptor, &self.options);
                if trail.items.is_empty() {
                    trail.items.push(BreadcrumbItem::current(
                        CrumbKind::Placeholder,
                        self.resolver.labels().preview_fallback.clone(),
                    ));
                }
                let html = HtmlRenderer::new(&self.options).render(&trail.items);
                self.memo.insert(Memo {
                    descriptor,
                    trail,
                    html,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{SiteSnapshot, TermEntry};

    fn renderer() -> PreviewRenderer<SiteSnapshot> {
        let site = SiteSnapshot::default().with_term(TermEntry {
            id: 5,
            taxonomy: "category".to_string(),
            name: "Recipes".to_string(),
            slug: "recipes".to_string(),
            url: "/category/recipes/".to_string(),
            parent: None,
        });
        PreviewRenderer::new(BreadcrumbResolver::new(site), RenderOptions::default())
    }

    #[test]
    fn test_preview_uses_heuristics() {
        let mut preview = renderer();
        let context = PreviewContext {
            template_slug: Some("category".to_string()),
            query_string: Some("category_name=recipes".to_string()),
            ..Default::default()
        };

        let trail = preview.trail(&context).clone();
        assert_eq!(trail.path(), "Home > Recipes");
        assert!(preview.render(&context).contains("aria-current=\"page\">Recipes</span>"));
    }

    #[test]
    fn test_empty_trail_falls_back_to_generic_crumb() {
        let mut preview = renderer();
        preview.set_options(RenderOptions::default().with_show_home(false));

        let html = preview.render(&PreviewContext::default()).to_string();
        assert!(html.contains("aria-current=\"page\">Current Page</span>"));
        assert!(html.contains("<ol"));
    }

    #[test]
    fn test_memoized_until_context_changes() {
        let mut preview = renderer();
        let a = PreviewContext {
            url_path: Some("/search/".to_string()),
            query_string: Some("s=soup".to_string()),
            ..Default::default()
        };
        let first = preview.render(&a).to_string();
        let second = preview.render(&a.clone()).to_string();
        assert_eq!(first, second);

        let b = PreviewContext {
            query_string: Some("s=stew".to_string()),
            ..a
        };
        let third = preview.render(&b).to_string();
        assert_ne!(first, third);
        assert!(third.contains("stew"));
    }

    #[test]
    fn test_set_options_invalidates() {
        let mut preview = renderer();
        let ctx = PreviewContext::default();
        let before = preview.render(&ctx).to_string();
        preview.set_options(RenderOptions::default().with_aria_label("Trail"));
        let after = preview.render(&ctx).to_string();
        assert_ne!(before, after);
        assert!(after.contains("aria-label=\"Trail\""));
    }
}
