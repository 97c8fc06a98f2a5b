//! Trail building
//!
//! Walks the ownership and ancestry chain behind a [`Scenario`] and emits
//! the raw, root-to-leaf crumb sequence. Missing collaborator data drops
//! the affected crumb and never aborts the trail.

use crate::config::TrailLabels;
use crate::formatter::strip_tags;
use crate::models::{AuthorRef, BreadcrumbItem, CrumbKind, EntityRef, Scenario, TermTarget};
use crate::site::SiteGraph;
use chrono::{Month, NaiveDate};
use tracing::debug;

/// Builds raw crumb sequences from classified scenarios
pub struct TrailBuilder<'a, S: SiteGraph + ?Sized> {
    site: &'a S,
    labels: &'a TrailLabels,
}

impl<'a, S: SiteGraph + ?Sized> TrailBuilder<'a, S> {
    pub fn new(site: &'a S, labels: &'a TrailLabels) -> Self {
        Self { site, labels }
    }

    /// Build the trail for a scenario
    pub fn build(&self, scenario: &Scenario) -> Vec<BreadcrumbItem> {
        match scenario {
            Scenario::FrontPage | Scenario::Default => vec![self.home_current()],
            Scenario::BlogIndex => self.blog_index(),
            Scenario::SingularPage { post_id } => self.singular_page(*post_id),
            Scenario::SingularPost { post_id } => self.singular_post(*post_id),
            Scenario::SingularCustomType { post_id, post_type } => {
                self.singular_custom(*post_id, post_type)
            }
            Scenario::TermArchive { term, taxonomy } => self.term_archive(term, taxonomy),
            Scenario::PostTypeArchive { post_type } => self.post_type_archive(post_type),
            Scenario::Search { term } => self.search(term),
            Scenario::Author { author } => self.author(author),
            Scenario::DateArchive { year, month, day } => self.date_archive(*year, *month, *day),
            Scenario::NotFound => vec![
                self.home(),
                BreadcrumbItem::current(CrumbKind::NotFound, self.labels.not_found.clone()),
            ],
        }
    }

    fn home(&self) -> BreadcrumbItem {
        BreadcrumbItem::link(CrumbKind::Home, self.labels.home.clone(), self.site.home_url())
    }

    fn home_current(&self) -> BreadcrumbItem {
        BreadcrumbItem::current(CrumbKind::Home, self.labels.home.clone())
    }

    /// Linked crumb for an entity; `None` when the entity cannot be resolved
    fn entity_link(&self, kind: CrumbKind, entity: EntityRef) -> Option<BreadcrumbItem> {
        match self.site.title(&entity) {
            Some(title) => Some(BreadcrumbItem::link(kind, title, self.site.permalink(&entity))),
            None => {
                debug!(?entity, "omitting crumb for unresolved entity");
                None
            }
        }
    }

    fn entity_current(&self, kind: CrumbKind, entity: EntityRef) -> Option<BreadcrumbItem> {
        match self.site.title(&entity) {
            Some(title) => Some(BreadcrumbItem::current(kind, title)),
            None => {
                debug!(?entity, "omitting current crumb for unresolved entity");
                None
            }
        }
    }

    /// Linked crumbs for every ancestor of `entity`, nearest-root first
    fn ancestor_links(&self, kind: CrumbKind, entity: EntityRef) -> Vec<BreadcrumbItem> {
        let wrap = |id: u64| match entity {
            EntityRef::Term(_) => EntityRef::Term(id),
            _ => EntityRef::Post(id),
        };
        self.site
            .ancestors(&entity)
            .into_iter()
            .filter_map(|id| self.entity_link(kind, wrap(id)))
            .collect()
    }

    /// Ancestors plus the term itself, all linked
    fn term_chain(&self, term_id: u64) -> Vec<BreadcrumbItem> {
        let mut items = self.ancestor_links(CrumbKind::Term, EntityRef::Term(term_id));
        items.extend(self.entity_link(CrumbKind::Term, EntityRef::Term(term_id)));
        items
    }

    /// Designated primary term, else the first term the lookup returns
    fn primary_term(&self, post_id: u64, taxonomy: &str) -> Option<u64> {
        self.site
            .primary_term(post_id, taxonomy)
            .or_else(|| self.site.first_term(post_id, taxonomy))
    }

    fn blog_index_link(&self) -> Option<BreadcrumbItem> {
        let page = self.site.posts_page()?;
        self.entity_link(CrumbKind::BlogIndex, EntityRef::Post(page))
    }

    fn blog_index(&self) -> Vec<BreadcrumbItem> {
        let label = self
            .site
            .posts_page()
            .and_then(|id| self.site.title(&EntityRef::Post(id)))
            .unwrap_or_else(|| self.labels.blog.clone());
        vec![self.home(), BreadcrumbItem::current(CrumbKind::BlogIndex, label)]
    }

    fn singular_page(&self, post_id: u64) -> Vec<BreadcrumbItem> {
        let mut items = vec![self.home()];
        items.extend(self.ancestor_links(CrumbKind::Ancestor, EntityRef::Post(post_id)));
        items.extend(self.entity_current(CrumbKind::Entry, EntityRef::Post(post_id)));
        items
    }

    fn singular_post(&self, post_id: u64) -> Vec<BreadcrumbItem> {
        let mut items = vec![self.home()];
        items.extend(self.blog_index_link());
        if let Some(term_id) = self.primary_term(post_id, "category") {
            items.extend(self.term_chain(term_id));
        }
        items.extend(self.entity_current(CrumbKind::Entry, EntityRef::Post(post_id)));
        items
    }

    fn singular_custom(&self, post_id: u64, post_type: &str) -> Vec<BreadcrumbItem> {
        let mut items = vec![self.home()];
        let info = self.site.post_type(post_type);

        if let Some(info) = info.as_ref().filter(|i| i.has_archive) {
            items.push(BreadcrumbItem::link(
                CrumbKind::PostTypeArchive,
                info.label.clone(),
                self.site
                    .permalink(&EntityRef::PostTypeArchive(post_type.to_string())),
            ));
        }

        let first_taxonomy = info.as_ref().and_then(|i| i.taxonomies.first());
        if let Some(taxonomy) = first_taxonomy {
            if let Some(term_id) = self.primary_term(post_id, taxonomy) {
                items.extend(self.term_chain(term_id));
            }
        }

        items.extend(self.entity_current(CrumbKind::Entry, EntityRef::Post(post_id)));
        items
    }

    fn term_archive(&self, term: &TermTarget, taxonomy: &str) -> Vec<BreadcrumbItem> {
        let mut items = vec![self.home()];

        if taxonomy != "category" {
            if let Some(info) = self.site.taxonomy(taxonomy) {
                items.push(BreadcrumbItem::link(
                    CrumbKind::Taxonomy,
                    info.label,
                    info.archive_url.unwrap_or_default(),
                ));
            }
        }

        let resolved = match term {
            TermTarget::Id(id) => Some(*id),
            TermTarget::Slug(slug) => self.site.term_by_slug(taxonomy, slug),
            TermTarget::Unknown => None,
        };

        match (resolved, term) {
            (Some(term_id), _) => {
                items.extend(self.ancestor_links(CrumbKind::Term, EntityRef::Term(term_id)));
                items.extend(self.entity_current(CrumbKind::Term, EntityRef::Term(term_id)));
            }
            (None, TermTarget::Slug(slug)) => {
                items.push(BreadcrumbItem::current(CrumbKind::Term, humanize(slug)));
            }
            (None, _) => {
                let label = self
                    .site
                    .taxonomy(taxonomy)
                    .map(|info| info.label)
                    .unwrap_or_else(|| humanize(taxonomy));
                items.push(BreadcrumbItem::current(CrumbKind::Placeholder, label));
            }
        }
        items
    }

    fn post_type_archive(&self, post_type: &str) -> Vec<BreadcrumbItem> {
        let label = self
            .site
            .post_type(post_type)
            .map(|info| info.label)
            .unwrap_or_else(|| humanize(post_type));
        vec![
            self.home(),
            BreadcrumbItem::current(CrumbKind::PostTypeArchive, label),
        ]
    }

    fn search(&self, term: &str) -> Vec<BreadcrumbItem> {
        let label = self
            .labels
            .search_results
            .replace("{term}", &strip_tags(term));
        vec![self.home(), BreadcrumbItem::current(CrumbKind::Search, label)]
    }

    fn author(&self, author: &AuthorRef) -> Vec<BreadcrumbItem> {
        let name = match author {
            AuthorRef::Id(id) => self.site.title(&EntityRef::Author(*id)),
            AuthorRef::Name(name) => Some(name.trim().to_string()),
        };

        let label = match name {
            Some(name) if !name.trim().is_empty() => {
                self.labels.author_archive.replace("{name}", &name)
            }
            Some(_) => self.labels.author_fallback.clone(),
            None => {
                debug!(?author, "omitting crumb for unresolved author");
                return vec![self.home()];
            }
        };
        vec![self.home(), BreadcrumbItem::current(CrumbKind::Author, label)]
    }

    fn date_archive(
        &self,
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
    ) -> Vec<BreadcrumbItem> {
        let mut items = vec![self.home()];
        let month_name = month.and_then(month_name);
        // Only a valid calendar date earns a day crumb
        let day = match (year, month, day) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d).map(|_| d),
            (_, _, d) => d.filter(|d| (1..=31).contains(d)),
        };

        if let Some(y) = year {
            let label = self.labels.year_archive.replace("{year}", &y.to_string());
            if month_name.is_none() && day.is_none() {
                items.push(BreadcrumbItem::current(CrumbKind::Date, label));
            } else {
                items.push(BreadcrumbItem::link(
                    CrumbKind::Date,
                    label,
                    self.site.date_archive_url(y, None, None),
                ));
            }
        }

        if let Some(name) = month_name {
            let label = match year {
                Some(y) => format!("{} {}", name, y),
                None => name.to_string(),
            };
            if day.is_none() {
                items.push(BreadcrumbItem::current(CrumbKind::Date, label));
            } else {
                let url = year
                    .map(|y| self.site.date_archive_url(y, month, None))
                    .unwrap_or_default();
                items.push(BreadcrumbItem::link(CrumbKind::Date, label, url));
            }
        }

        if let Some(d) = day {
            let label = match (month_name, year) {
                (Some(name), Some(y)) => format!("{} {}, {}", name, d, y),
                (Some(name), None) => format!("{} {}", name, d),
                (None, _) => format!("Day {}", d),
            };
            items.push(BreadcrumbItem::current(CrumbKind::Date, label));
        }

        items
    }
}

fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Turn a slug into a display label: `coffee-beans` -> `Coffee Beans`
pub fn humanize(slug: &str) -> String {
    slug.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PostTypeInfo, TaxonomyInfo};
    use crate::site::{AuthorEntry, PostEntry, SiteSnapshot, TermEntry};
    use std::collections::BTreeMap;

    fn post(id: u64, post_type: &str, title: &str, parent: Option<u64>) -> PostEntry {
        PostEntry {
            id,
            post_type: post_type.to_string(),
            title: title.to_string(),
            url: format!("/p/{}/", id),
            parent,
            terms: BTreeMap::new(),
            primary_terms: BTreeMap::new(),
        }
    }

    fn term(id: u64, taxonomy: &str, name: &str, parent: Option<u64>) -> TermEntry {
        TermEntry {
            id,
            taxonomy: taxonomy.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            url: format!("/t/{}/", id),
            parent,
        }
    }

    fn site() -> SiteSnapshot {
        let mut article = post(20, "post", "Brewing Guide", None);
        article
            .terms
            .insert("category".to_string(), vec![31, 30]);
        article
            .primary_terms
            .insert("category".to_string(), 31);

        let mut product = post(40, "product", "Blue Mug", None);
        product.terms.insert("product_cat".to_string(), vec![51]);

        SiteSnapshot::new("/")
            .with_post(post(1, "page", "About", None))
            .with_post(post(2, "page", "Team", Some(1)))
            .with_post(post(3, "page", "Engineering", Some(2)))
            .with_post(post(10, "page", "News", None))
            .with_post(article)
            .with_post(product)
            .with_term(term(30, "category", "Drinks", None))
            .with_term(term(31, "category", "Coffee", Some(30)))
            .with_term(term(50, "product_cat", "Kitchen", None))
            .with_term(term(51, "product_cat", "Mugs", Some(50)))
            .with_author(AuthorEntry {
                id: 7,
                display_name: "Jane Doe".to_string(),
                url: "/author/jane/".to_string(),
            })
            .with_post_type(PostTypeInfo {
                name: "product".to_string(),
                label: "Products".to_string(),
                has_archive: true,
                archive_url: Some("/shop/".to_string()),
                taxonomies: vec!["product_cat".to_string()],
            })
            .with_taxonomy(TaxonomyInfo {
                name: "product_cat".to_string(),
                label: "Product Categories".to_string(),
                archive_url: None,
            })
    }

    fn labels(items: &[BreadcrumbItem]) -> Vec<&str> {
        items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_front_page_is_single_current() {
        let site = site();
        let default_labels = TrailLabels::default();
        let items = TrailBuilder::new(&site, &default_labels).build(&Scenario::FrontPage);
        assert_eq!(items.len(), 1);
        assert!(items[0].is_current);
        assert!(items[0].url.is_empty());
    }

    #[test]
    fn test_page_with_ancestors() {
        let site = site();
        let default_labels = TrailLabels::default();
        let items = TrailBuilder::new(&site, &default_labels)
            .build(&Scenario::SingularPage { post_id: 3 });
        assert_eq!(labels(&items), vec!["Home", "About", "Team", "Engineering"]);
        assert_eq!(items[1].url, "/p/1/");
        assert!(items[3].is_current);
    }

    #[test]
    fn test_post_uses_primary_category_and_blog_index() {
        let site = site().with_posts_page(10);
        let default_labels = TrailLabels::default();
        let items = TrailBuilder::new(&site, &default_labels)
            .build(&Scenario::SingularPost { post_id: 20 });
        assert_eq!(
            labels(&items),
            vec!["Home", "News", "Drinks", "Coffee", "Brewing Guide"]
        );
    }

    #[test]
    fn test_custom_type_trail() {
        let site = site();
        let default_labels = TrailLabels::default();
        let items = TrailBuilder::new(&site, &default_labels).build(&Scenario::SingularCustomType {
            post_id: 40,
            post_type: "product".to_string(),
        });
        assert_eq!(
            labels(&items),
            vec!["Home", "Products", "Kitchen", "Mugs", "Blue Mug"]
        );
        assert_eq!(items[1].url, "/shop/");
    }

    #[test]
    fn test_term_archive_taxonomy_crumb() {
        let site = site();
        let default_labels = TrailLabels::default();
        let builder = TrailBuilder::new(&site, &default_labels);

        let items = builder.build(&Scenario::TermArchive {
            term: TermTarget::Id(51),
            taxonomy: "product_cat".to_string(),
        });
        assert_eq!(
            labels(&items),
            vec!["Home", "Product Categories", "Kitchen", "Mugs"]
        );
        assert!(items[1].url.is_empty());

        let items = builder.build(&Scenario::TermArchive {
            term: TermTarget::Id(31),
            taxonomy: "category".to_string(),
        });
        assert_eq!(labels(&items), vec!["Home", "Drinks", "Coffee"]);
    }

    #[test]
    fn test_term_archive_slug_and_placeholder() {
        let site = site();
        let default_labels = TrailLabels::default();
        let builder = TrailBuilder::new(&site, &default_labels);

        let items = builder.build(&Scenario::TermArchive {
            term: TermTarget::Slug("coffee".to_string()),
            taxonomy: "category".to_string(),
        });
        assert_eq!(labels(&items), vec!["Home", "Drinks", "Coffee"]);

        let items = builder.build(&Scenario::TermArchive {
            term: TermTarget::Slug("cold-brew".to_string()),
            taxonomy: "post_tag".to_string(),
        });
        assert_eq!(labels(&items), vec!["Home", "Cold Brew"]);

        let items = builder.build(&Scenario::TermArchive {
            term: TermTarget::Unknown,
            taxonomy: "post_tag".to_string(),
        });
        assert_eq!(labels(&items), vec!["Home", "Post Tag"]);
        assert!(items[1].is_current);
    }

    #[test]
    fn test_broken_term_reference_is_omitted() {
        let site = site();
        let default_labels = TrailLabels::default();
        let items = TrailBuilder::new(&site, &default_labels).build(&Scenario::TermArchive {
            term: TermTarget::Id(999),
            taxonomy: "category".to_string(),
        });
        assert_eq!(labels(&items), vec!["Home"]);
    }

    #[test]
    fn test_search_and_author_labels() {
        let site = site();
        let default_labels = TrailLabels::default();
        let builder = TrailBuilder::new(&site, &default_labels);

        let items = builder.build(&Scenario::Search {
            term: "<em>mugs</em>".to_string(),
        });
        assert_eq!(items[1].label, "Search Results for \"mugs\"");

        let items = builder.build(&Scenario::Author {
            author: AuthorRef::Id(7),
        });
        assert_eq!(items[1].label, "Articles by Jane Doe");

        let items = builder.build(&Scenario::Author {
            author: AuthorRef::Name(String::new()),
        });
        assert_eq!(items[1].label, "Author Archive");
    }

    #[test]
    fn test_author_display_name_kept_verbatim() {
        let site = site();
        let default_labels = TrailLabels::default();
        let builder = TrailBuilder::new(&site, &default_labels);

        for name in ["Mary-Jane o_neil", "de la Cruz", "  J. R. R. Tolkien "] {
            let items = builder.build(&Scenario::Author {
                author: AuthorRef::Name(name.to_string()),
            });
            assert_eq!(items[1].label, format!("Articles by {}", name.trim()));
        }
    }

    #[test]
    fn test_date_archive_incremental() {
        let site = site();
        let default_labels = TrailLabels::default();
        let builder = TrailBuilder::new(&site, &default_labels);

        let items = builder.build(&Scenario::DateArchive {
            year: Some(2023),
            month: Some(4),
            day: Some(9),
        });
        assert_eq!(
            labels(&items),
            vec!["Home", "Year 2023", "April 2023", "April 9, 2023"]
        );
        assert_eq!(items[1].url, "/2023/");
        assert_eq!(items[2].url, "/2023/04/");
        assert!(!items[2].is_current);
        assert!(items[3].is_current);

        let items = builder.build(&Scenario::DateArchive {
            year: Some(2023),
            month: Some(2),
            day: Some(30),
        });
        assert_eq!(labels(&items), vec!["Home", "Year 2023", "February 2023"]);
        assert!(items[2].is_current);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("cold-brew"), "Cold Brew");
        assert_eq!(humanize("post_tag"), "Post Tag");
        assert_eq!(humanize(""), "");
    }
}
