//! Data models for breadcrumb resolution
//!
//! This module defines the core data structures used throughout the resolver,
//! including the normalized location descriptor, the classified scenario,
//! and the breadcrumb items handed to renderers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authoritative page-type classification reported by a live query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    FrontPage,
    BlogIndex,
    Singular,
    TermArchive,
    PostTypeArchive,
    Search,
    Author,
    DateArchive,
    NotFound,
}

impl QueryKind {
    /// Get human-readable label for the query kind
    pub fn label(&self) -> &'static str {
        match self {
            QueryKind::FrontPage => "front page",
            QueryKind::BlogIndex => "blog index",
            QueryKind::Singular => "singular",
            QueryKind::TermArchive => "term archive",
            QueryKind::PostTypeArchive => "post type archive",
            QueryKind::Search => "search",
            QueryKind::Author => "author",
            QueryKind::DateArchive => "date archive",
            QueryKind::NotFound => "not found",
        }
    }
}

/// Author reference: a known user id or a bare display name/slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRef {
    Id(u64),
    Name(String),
}

/// Date archive parts; absent parts produce no crumb
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateParts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl DateParts {
    /// Year-only parts
    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Default::default()
        }
    }

    /// Check whether no part is present
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }
}

/// A term taken from the editor's preview-term list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermHint {
    pub term_id: u64,
    pub taxonomy: String,
}

/// Taxonomy filter inherited from an enclosing query loop
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryTerms {
    pub taxonomy: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<u64>,
}

/// Canonical, type-tagged description of the location being rendered.
///
/// When `query_kind` is present the descriptor came from an authoritative
/// query and classification uses it directly. When absent, classification
/// falls back to the speculative path over the remaining fields and
/// `raw_hints`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preview_terms: Vec<TermHint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_kind: Option<QueryKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_parts: Option<DateParts>,

    /// Query-loop taxonomy filter; weaker than any block attribute or hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_terms: Option<QueryTerms>,

    /// Lower-cased free-form signals, consulted only on the speculative path
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub raw_hints: BTreeMap<String, String>,
}

impl LocationDescriptor {
    /// Create an authoritative descriptor of the given kind
    pub fn authoritative(kind: QueryKind) -> Self {
        Self {
            query_kind: Some(kind),
            ..Default::default()
        }
    }

    /// Whether classification will take the authoritative path
    pub fn is_authoritative(&self) -> bool {
        self.query_kind.is_some()
    }

    /// Look up a raw hint by key
    pub fn hint(&self, key: &str) -> Option<&str> {
        self.raw_hints
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn with_post(mut self, post_id: u64, post_type: &str) -> Self {
        self.post_id = Some(post_id);
        self.post_type = Some(post_type.to_string());
        self
    }

    pub fn with_term(mut self, term_id: u64, taxonomy: &str) -> Self {
        self.term_id = Some(term_id);
        self.taxonomy = Some(taxonomy.to_string());
        self
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search_term = Some(term.to_string());
        self
    }

    pub fn with_date(mut self, parts: DateParts) -> Self {
        self.date_parts = Some(parts);
        self
    }

    pub fn with_hint(mut self, key: &str, value: &str) -> Self {
        self.raw_hints.insert(key.to_string(), value.to_lowercase());
        self
    }
}

/// Which term an archive scenario points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermTarget {
    Id(u64),
    /// Slug recovered from hints; resolved through the site if possible
    Slug(String),
    /// Archive of a taxonomy whose term could not be determined
    Unknown,
}

/// The classified kind of page being rendered
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum Scenario {
    FrontPage,
    BlogIndex,
    SingularPost { post_id: u64 },
    SingularPage { post_id: u64 },
    SingularCustomType { post_id: u64, post_type: String },
    TermArchive { term: TermTarget, taxonomy: String },
    PostTypeArchive { post_type: String },
    Search { term: String },
    Author { author: AuthorRef },
    DateArchive {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        year: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        month: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        day: Option<u32>,
    },
    NotFound,
    Default,
}

impl Scenario {
    /// Get human-readable label for the scenario
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::FrontPage => "front page",
            Scenario::BlogIndex => "blog index",
            Scenario::SingularPost { .. } => "post",
            Scenario::SingularPage { .. } => "page",
            Scenario::SingularCustomType { .. } => "custom entry",
            Scenario::TermArchive { .. } => "term archive",
            Scenario::PostTypeArchive { .. } => "post type archive",
            Scenario::Search { .. } => "search",
            Scenario::Author { .. } => "author",
            Scenario::DateArchive { .. } => "date archive",
            Scenario::NotFound => "not found",
            Scenario::Default => "default",
        }
    }

    /// Check if the scenario names a single entry
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            Scenario::SingularPost { .. }
                | Scenario::SingularPage { .. }
                | Scenario::SingularCustomType { .. }
        )
    }
}

/// Role a crumb plays in the trail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrumbKind {
    Home,
    BlogIndex,
    PostTypeArchive,
    Taxonomy,
    Term,
    Ancestor,
    Entry,
    Search,
    Author,
    Date,
    NotFound,
    /// Generic stand-in when nothing better is known
    #[default]
    Placeholder,
}

/// A single labeled (and optionally linked) step in a trail
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    /// Plain-text label
    pub label: String,

    /// Target URL, empty when the item is not linkable
    #[serde(default)]
    pub url: String,

    /// Whether this item represents the current location
    #[serde(default)]
    pub is_current: bool,

    #[serde(default)]
    pub kind: CrumbKind,
}

impl BreadcrumbItem {
    /// Create a linked, non-current item
    pub fn link(kind: CrumbKind, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            is_current: false,
            kind,
        }
    }

    /// Create the current item; it never carries a URL
    pub fn current(kind: CrumbKind, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: String::new(),
            is_current: true,
            kind,
        }
    }

    /// Whether the item renders as a hyperlink
    pub fn is_linked(&self) -> bool {
        !self.is_current && !self.url.is_empty()
    }
}

/// Entity addressed through the site collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
    Post(u64),
    Term(u64),
    Author(u64),
    PostTypeArchive(String),
}

/// Post type registration data supplied by the collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTypeInfo {
    pub name: String,

    /// Plural label, used for archive crumbs
    pub label: String,

    #[serde(default)]
    pub has_archive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,

    /// Declared taxonomies; the first one drives term crumbs
    #[serde(default)]
    pub taxonomies: Vec<String>,
}

/// Taxonomy registration data supplied by the collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyInfo {
    pub name: String,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,
}

/// Classified location and the finalized trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTrail {
    pub scenario: Scenario,

    pub items: Vec<BreadcrumbItem>,
}

impl ResolvedTrail {
    /// Get the formatted path string
    pub fn path(&self) -> String {
        self.items
            .iter()
            .map(|i| i.label.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Get the current item, if any
    pub fn current(&self) -> Option<&BreadcrumbItem> {
        self.items.iter().rev().find(|i| i.is_current)
    }
}
