//! Site data collaborator
//!
//! The resolver never owns content; every title, URL, and parent link comes
//! through [`SiteGraph`]. [`SiteSnapshot`] is a serde-loadable in-memory
//! implementation used by the CLI, the preview bindings, and tests.

use crate::models::{EntityRef, PostTypeInfo, TaxonomyInfo};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Read-only queries the resolver makes against site content
pub trait SiteGraph {
    /// URL of the site root
    fn home_url(&self) -> String;

    /// Parent of an entity within its own hierarchy
    fn parent_of(&self, entity: &EntityRef) -> Option<u64>;

    /// Ancestors of an entity, nearest-root first.
    ///
    /// The default walks [`SiteGraph::parent_of`] and stops at the first
    /// repeated id, so a cyclic parent chain is truncated rather than
    /// looping.
    fn ancestors(&self, entity: &EntityRef) -> Vec<u64> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        if let Some(id) = entity_id(entity) {
            seen.insert(id);
        }

        let mut cursor = entity.clone();
        while let Some(parent) = self.parent_of(&cursor) {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            cursor = match cursor {
                EntityRef::Post(_) => EntityRef::Post(parent),
                EntityRef::Term(_) => EntityRef::Term(parent),
                _ => break,
            };
        }

        chain.reverse();
        chain
    }

    /// Explicitly designated primary term of a post for a taxonomy
    fn primary_term(&self, post_id: u64, taxonomy: &str) -> Option<u64>;

    /// First term the standard lookup returns; order is the collaborator's
    fn first_term(&self, post_id: u64, taxonomy: &str) -> Option<u64>;

    /// Display title or name of an entity
    fn title(&self, entity: &EntityRef) -> Option<String>;

    /// Permalink of an entity, empty if it has none
    fn permalink(&self, entity: &EntityRef) -> String;

    /// Page designated as the posts index, if any
    fn posts_page(&self) -> Option<u64>;

    fn post_type_of(&self, post_id: u64) -> Option<String>;

    fn term_taxonomy(&self, term_id: u64) -> Option<String>;

    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Option<u64>;

    fn post_type(&self, name: &str) -> Option<PostTypeInfo>;

    fn taxonomy(&self, name: &str) -> Option<TaxonomyInfo>;

    /// URL of a year, month, or day archive
    fn date_archive_url(&self, _year: i32, _month: Option<u32>, _day: Option<u32>) -> String {
        String::new()
    }
}

fn entity_id(entity: &EntityRef) -> Option<u64> {
    match entity {
        EntityRef::Post(id) | EntityRef::Term(id) | EntityRef::Author(id) => Some(*id),
        EntityRef::PostTypeArchive(_) => None,
    }
}

impl<T: SiteGraph + ?Sized> SiteGraph for &T {
    fn home_url(&self) -> String {
        (**self).home_url()
    }
    fn parent_of(&self, entity: &EntityRef) -> Option<u64> {
        (**self).parent_of(entity)
    }
    fn ancestors(&self, entity: &EntityRef) -> Vec<u64> {
        (**self).ancestors(entity)
    }
    fn primary_term(&self, post_id: u64, taxonomy: &str) -> Option<u64> {
        (**self).primary_term(post_id, taxonomy)
    }
    fn first_term(&self, post_id: u64, taxonomy: &str) -> Option<u64> {
        (**self).first_term(post_id, taxonomy)
    }
    fn title(&self, entity: &EntityRef) -> Option<String> {
        (**self).title(entity)
    }
    fn permalink(&self, entity: &EntityRef) -> String {
        (**self).permalink(entity)
    }
    fn posts_page(&self) -> Option<u64> {
        (**self).posts_page()
    }
    fn post_type_of(&self, post_id: u64) -> Option<String> {
        (**self).post_type_of(post_id)
    }
    fn term_taxonomy(&self, term_id: u64) -> Option<String> {
        (**self).term_taxonomy(term_id)
    }
    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Option<u64> {
        (**self).term_by_slug(taxonomy, slug)
    }
    fn post_type(&self, name: &str) -> Option<PostTypeInfo> {
        (**self).post_type(name)
    }
    fn taxonomy(&self, name: &str) -> Option<TaxonomyInfo> {
        (**self).taxonomy(name)
    }
    fn date_archive_url(&self, year: i32, month: Option<u32>, day: Option<u32>) -> String {
        (**self).date_archive_url(year, month, day)
    }
}

/// A post, page, or custom entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub id: u64,

    #[serde(default = "default_post_type")]
    pub post_type: String,

    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,

    /// Assigned term ids per taxonomy, in lookup order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub terms: BTreeMap<String, Vec<u64>>,

    /// Explicit primary term per taxonomy
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub primary_terms: BTreeMap<String, u64>,
}

fn default_post_type() -> String {
    "post".to_string()
}

/// A taxonomy term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub id: u64,

    pub taxonomy: String,

    pub name: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
}

/// A content author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorEntry {
    pub id: u64,

    pub display_name: String,

    #[serde(default)]
    pub url: String,
}

/// In-memory site content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSnapshot {
    #[serde(default = "default_home_url")]
    pub home_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts_page: Option<u64>,

    #[serde(default)]
    pub posts: Vec<PostEntry>,

    #[serde(default)]
    pub terms: Vec<TermEntry>,

    #[serde(default)]
    pub authors: Vec<AuthorEntry>,

    #[serde(default)]
    pub post_types: Vec<PostTypeInfo>,

    #[serde(default)]
    pub taxonomies: Vec<TaxonomyInfo>,
}

fn default_home_url() -> String {
    "/".to_string()
}

impl Default for SiteSnapshot {
    fn default() -> Self {
        Self {
            home_url: default_home_url(),
            posts_page: None,
            posts: Vec::new(),
            terms: Vec::new(),
            authors: Vec::new(),
            post_types: Vec::new(),
            taxonomies: Vec::new(),
        }
    }
}

impl SiteSnapshot {
    /// Create an empty snapshot rooted at `home_url`
    pub fn new(home_url: &str) -> Self {
        Self {
            home_url: home_url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_post(mut self, post: PostEntry) -> Self {
        self.posts.push(post);
        self
    }

    pub fn with_term(mut self, term: TermEntry) -> Self {
        self.terms.push(term);
        self
    }

    pub fn with_author(mut self, author: AuthorEntry) -> Self {
        self.authors.push(author);
        self
    }

    pub fn with_post_type(mut self, info: PostTypeInfo) -> Self {
        self.post_types.push(info);
        self
    }

    pub fn with_taxonomy(mut self, info: TaxonomyInfo) -> Self {
        self.taxonomies.push(info);
        self
    }

    pub fn with_posts_page(mut self, id: u64) -> Self {
        self.posts_page = Some(id);
        self
    }

    fn find_post(&self, id: u64) -> Option<&PostEntry> {
        self.posts.iter().find(|p| p.id == id)
    }

    fn find_term(&self, id: u64) -> Option<&TermEntry> {
        self.terms.iter().find(|t| t.id == id)
    }

    fn find_author(&self, id: u64) -> Option<&AuthorEntry> {
        self.authors.iter().find(|a| a.id == id)
    }
}

impl SiteGraph for SiteSnapshot {
    fn home_url(&self) -> String {
        self.home_url.clone()
    }

    fn parent_of(&self, entity: &EntityRef) -> Option<u64> {
        match entity {
            EntityRef::Post(id) => self.find_post(*id).and_then(|p| p.parent),
            EntityRef::Term(id) => self.find_term(*id).and_then(|t| t.parent),
            _ => None,
        }
    }

    fn primary_term(&self, post_id: u64, taxonomy: &str) -> Option<u64> {
        self.find_post(post_id)
            .and_then(|p| p.primary_terms.get(taxonomy).copied())
    }

    fn first_term(&self, post_id: u64, taxonomy: &str) -> Option<u64> {
        self.find_post(post_id)
            .and_then(|p| p.terms.get(taxonomy))
            .and_then(|ids| ids.first().copied())
    }

    fn title(&self, entity: &EntityRef) -> Option<String> {
        match entity {
            EntityRef::Post(id) => self.find_post(*id).map(|p| p.title.clone()),
            EntityRef::Term(id) => self.find_term(*id).map(|t| t.name.clone()),
            EntityRef::Author(id) => self.find_author(*id).map(|a| a.display_name.clone()),
            EntityRef::PostTypeArchive(name) => self.post_type(name).map(|pt| pt.label),
        }
    }

    fn permalink(&self, entity: &EntityRef) -> String {
        match entity {
            EntityRef::Post(id) => self.find_post(*id).map(|p| p.url.clone()),
            EntityRef::Term(id) => self.find_term(*id).map(|t| t.url.clone()),
            EntityRef::Author(id) => self.find_author(*id).map(|a| a.url.clone()),
            EntityRef::PostTypeArchive(name) => self
                .post_type(name)
                .filter(|pt| pt.has_archive)
                .and_then(|pt| pt.archive_url),
        }
        .unwrap_or_default()
    }

    fn posts_page(&self) -> Option<u64> {
        self.posts_page
    }

    fn post_type_of(&self, post_id: u64) -> Option<String> {
        self.find_post(post_id).map(|p| p.post_type.clone())
    }

    fn term_taxonomy(&self, term_id: u64) -> Option<String> {
        self.find_term(term_id).map(|t| t.taxonomy.clone())
    }

    fn term_by_slug(&self, taxonomy: &str, slug: &str) -> Option<u64> {
        self.terms
            .iter()
            .find(|t| t.taxonomy == taxonomy && t.slug.eq_ignore_ascii_case(slug))
            .map(|t| t.id)
    }

    fn post_type(&self, name: &str) -> Option<PostTypeInfo> {
        self.post_types.iter().find(|pt| pt.name == name).cloned()
    }

    fn taxonomy(&self, name: &str) -> Option<TaxonomyInfo> {
        self.taxonomies.iter().find(|t| t.name == name).cloned()
    }

    fn date_archive_url(&self, year: i32, month: Option<u32>, day: Option<u32>) -> String {
        let mut url = format!("{}/{}/", self.home_url.trim_end_matches('/'), year);
        if let Some(month) = month {
            url.push_str(&format!("{:02}/", month));
            if let Some(day) = day {
                url.push_str(&format!("{:02}/", day));
            }
        }
        url
    }
}
