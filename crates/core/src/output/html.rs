//! Server-side HTML renderer
//!
//! Emits a `nav` landmark around an ordered list carrying schema.org
//! `BreadcrumbList` microdata. The preview renderer writes the same shape
//! through [`HtmlRenderer`].

use crate::config::RenderOptions;
use crate::models::BreadcrumbItem;

/// CSS class on the wrapping `nav`
pub const NAV_CLASS: &str = "ace-breadcrumbs";

/// CSS class on the placeholder emitted for an empty trail
pub const PLACEHOLDER_CLASS: &str = "ace-breadcrumbs-placeholder";

/// Escape text for use in element content or a quoted attribute
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders finalized items as breadcrumb markup
pub struct HtmlRenderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    /// Render a finalized trail; an empty trail yields the placeholder
    pub fn render(&self, items: &[BreadcrumbItem]) -> String {
        if items.is_empty() {
            return self.placeholder();
        }

        let separator = escape_html(&self.options.sanitized_separator());
        let mut output = String::new();

        output.push_str(&format!(
            "<nav class=\"{}\" aria-label=\"{}\">",
            NAV_CLASS,
            escape_html(&self.options.aria_label)
        ));

        if self.options.show_label && !self.options.label_text.trim().is_empty() {
            output.push_str(&format!(
                "<span class=\"{}__label\">{}</span>",
                NAV_CLASS,
                escape_html(self.options.label_text.trim())
            ));
        }

        output.push_str("<ol itemscope itemtype=\"https://schema.org/BreadcrumbList\">");

        for (idx, item) in items.iter().enumerate() {
            output.push_str(
                "<li itemprop=\"itemListElement\" itemscope itemtype=\"https://schema.org/ListItem\">",
            );
            if idx > 0 {
                output.push_str(&format!(
                    "<span class=\"{}__separator\" aria-hidden=\"true\">{}</span>",
                    NAV_CLASS, separator
                ));
            }
            output.push_str(&render_item(item));
            output.push_str(&format!(
                "<meta itemprop=\"position\" content=\"{}\">",
                idx + 1
            ));
            output.push_str("</li>");
        }

        output.push_str("</ol></nav>");
        output
    }

    /// Markup shown when no trail could be resolved
    fn placeholder(&self) -> String {
        format!(
            "<div class=\"{}\" role=\"note\">Breadcrumbs could not be resolved for this location.</div>",
            PLACEHOLDER_CLASS
        )
    }
}

fn render_item(item: &BreadcrumbItem) -> String {
    let label = escape_html(&item.label);
    if item.is_current {
        format!(
            "<span itemprop=\"name\" aria-current=\"page\">{}</span>",
            label
        )
    } else if item.is_linked() {
        format!(
            "<a itemprop=\"item\" href=\"{}\"><span itemprop=\"name\">{}</span></a>",
            escape_html(&item.url),
            label
        )
    } else {
        format!("<span itemprop=\"name\">{}</span>", label)
    }
}

/// Render items with the given options
pub fn format_html(items: &[BreadcrumbItem], options: &RenderOptions) -> String {
    HtmlRenderer::new(options).render(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrumbKind;

    fn trail() -> Vec<BreadcrumbItem> {
        vec![
            BreadcrumbItem::link(CrumbKind::Home, "Home", "/"),
            BreadcrumbItem::link(CrumbKind::Taxonomy, "Topics", ""),
            BreadcrumbItem::current(CrumbKind::Entry, "Fish & Chips"),
        ]
    }

    #[test]
    fn test_render_structure() {
        let html = format_html(&trail(), &RenderOptions::default());

        assert!(html.starts_with("<nav class=\"ace-breadcrumbs\" aria-label=\"Breadcrumbs\">"));
        assert!(html.contains("itemtype=\"https://schema.org/BreadcrumbList\""));
        assert_eq!(html.matches("https://schema.org/ListItem").count(), 3);
        assert!(html.contains("<meta itemprop=\"position\" content=\"1\">"));
        assert!(html.contains("<meta itemprop=\"position\" content=\"3\">"));
        assert_eq!(html.matches("__separator").count(), 2);
        assert!(html.contains("<a itemprop=\"item\" href=\"/\">"));
        assert!(html.contains("<span itemprop=\"name\">Topics</span>"));
        assert!(html.contains("aria-current=\"page\">Fish &amp; Chips</span>"));
        assert!(!html.contains("__label"));
        assert!(html.ends_with("</ol></nav>"));
    }

    #[test]
    fn test_separator_not_before_first() {
        let html = format_html(&trail(), &RenderOptions::default().with_separator("»"));
        let first_li = html.find("<li").unwrap();
        let first_sep = html.find("__separator").unwrap();
        let first_link = html.find("<a ").unwrap();
        assert!(first_link < first_sep);
        assert!(first_li < first_link);
        assert!(html.contains(">»</span>"));
    }

    #[test]
    fn test_leading_label() {
        let html = format_html(&trail(), &RenderOptions::default().with_label("You are here:"));
        assert!(html.contains("__label\">You are here:</span><ol"));
    }

    #[test]
    fn test_empty_trail_placeholder() {
        let html = format_html(&[], &RenderOptions::default());
        assert!(html.contains(PLACEHOLDER_CLASS));
        assert!(!html.contains("<ol"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("<a href='x'>\"&\"</a>"), "&lt;a href=&#39;x&#39;&gt;&quot;&amp;&quot;&lt;/a&gt;");
    }
}
