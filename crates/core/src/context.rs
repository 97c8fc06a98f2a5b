//! Context normalization
//!
//! Turns either an authoritative live query state or an incomplete editor
//! preview context into exactly one [`LocationDescriptor`].

use crate::models::{AuthorRef, DateParts, LocationDescriptor, QueryKind, QueryTerms, TermHint};
use crate::trail::humanize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Boolean page-type flags as reported by a live query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFlags {
    pub is_front_page: bool,
    pub is_home: bool,
    pub is_singular: bool,
    pub is_category: bool,
    pub is_tag: bool,
    pub is_tax: bool,
    pub is_post_type_archive: bool,
    pub is_search: bool,
    pub is_author: bool,
    pub is_date: bool,
    pub is_404: bool,
}

/// Authoritative state of the request being rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryState {
    #[serde(default)]
    pub flags: QueryFlags,

    /// False when rendering inside a nested or secondary loop
    #[serde(default = "default_true")]
    pub is_main_query: bool,

    #[serde(default)]
    pub post_id: Option<u64>,

    #[serde(default)]
    pub post_type: Option<String>,

    #[serde(default)]
    pub term_id: Option<u64>,

    #[serde(default)]
    pub taxonomy: Option<String>,

    #[serde(default)]
    pub search_term: Option<String>,

    #[serde(default)]
    pub author_id: Option<u64>,

    #[serde(default)]
    pub author_name: Option<String>,

    /// Raw query vars; parsed leniently
    #[serde(default)]
    pub year: Option<String>,

    #[serde(default)]
    pub month: Option<String>,

    #[serde(default)]
    pub day: Option<String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            flags: QueryFlags::default(),
            is_main_query: true,
            post_id: None,
            post_type: None,
            term_id: None,
            taxonomy: None,
            search_term: None,
            author_id: None,
            author_name: None,
            year: None,
            month: None,
            day: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Query context a block inherits from its enclosing query loop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryContext {
    pub post_type: Option<String>,
    pub author: Option<String>,
    pub search: Option<String>,
    pub taxonomy: Option<String>,
    pub terms: Vec<u64>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

/// Signals available to an editor preview or a REST-rendered block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewContext {
    pub post_id: Option<u64>,
    pub post_type: Option<String>,
    pub term_id: Option<u64>,
    pub taxonomy: Option<String>,
    pub preview_terms: Vec<TermHint>,
    pub template_slug: Option<String>,
    pub url_path: Option<String>,
    pub query_string: Option<String>,
    pub query: Option<QueryContext>,
}

/// Everything a caller knows about the current render
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    /// Present only when the caller can vouch for the live request
    pub query: Option<QueryState>,

    pub preview: PreviewContext,
}

impl RenderContext {
    pub fn live(query: QueryState) -> Self {
        Self {
            query: Some(query),
            preview: PreviewContext::default(),
        }
    }

    pub fn preview(preview: PreviewContext) -> Self {
        Self {
            query: None,
            preview,
        }
    }
}

/// Produce the descriptor for a render context.
///
/// A main-query state wins outright. A secondary-loop state is ignored so
/// embedded query blocks do not report the outer page's location.
pub fn normalize(context: &RenderContext) -> LocationDescriptor {
    match &context.query {
        Some(state) if state.is_main_query => normalize_query(state),
        Some(_) => {
            debug!("nested query loop, deferring to heuristic mode");
            normalize_preview(&context.preview)
        }
        None => normalize_preview(&context.preview),
    }
}

/// Authoritative descriptor from live query state; no hints are collected
pub fn normalize_query(state: &QueryState) -> LocationDescriptor {
    let author = match (state.author_id, &state.author_name) {
        (Some(id), _) => Some(AuthorRef::Id(id)),
        (None, Some(name)) if !name.trim().is_empty() => Some(AuthorRef::Name(name.clone())),
        _ => None,
    };

    LocationDescriptor {
        post_id: state.post_id,
        post_type: non_empty(state.post_type.as_deref()),
        term_id: state.term_id,
        taxonomy: non_empty(state.taxonomy.as_deref()),
        preview_terms: Vec::new(),
        query_kind: state.flags.kind(),
        search_term: state.search_term.clone(),
        author,
        date_parts: parse_date_parts(
            state.year.as_deref(),
            state.month.as_deref(),
            state.day.as_deref(),
        ),
        query_terms: None,
        raw_hints: BTreeMap::new(),
    }
}

/// Speculative descriptor: every signal lands in `raw_hints`, lower-cased
pub fn normalize_preview(preview: &PreviewContext) -> LocationDescriptor {
    let mut hints = BTreeMap::new();

    if let Some(id) = preview.post_id {
        hints.insert("post_id".to_string(), id.to_string());
    }
    if let Some(id) = preview.term_id {
        hints.insert("term_id".to_string(), id.to_string());
    }
    insert_hint(&mut hints, "post_type", preview.post_type.as_deref());
    insert_hint(&mut hints, "taxonomy", preview.taxonomy.as_deref());
    insert_hint(&mut hints, "template", preview.template_slug.as_deref());
    if let Some(first) = preview.preview_terms.first() {
        insert_hint(&mut hints, "preview_taxonomy", Some(&first.taxonomy));
    }

    if let Some(path) = preview.url_path.as_deref() {
        let trimmed = path.trim_matches('/');
        insert_hint(&mut hints, "path", Some(trimmed));
    }

    if let Some(qs) = preview.query_string.as_deref() {
        for (key, value) in parse_query_string(qs) {
            hints.insert(format!("arg.{}", key.to_lowercase()), value.to_lowercase());
        }
    }

    let query = preview.query.clone().unwrap_or_default();

    let search_term = non_empty(query.search.as_deref());
    let author = non_empty(query.author.as_deref()).map(|a| match a.parse::<u64>() {
        Ok(id) => AuthorRef::Id(id),
        Err(_) => AuthorRef::Name(humanize(&a)),
    });

    let query_terms = non_empty(query.taxonomy.as_deref()).map(|taxonomy| QueryTerms {
        taxonomy,
        terms: query.terms.clone(),
    });

    LocationDescriptor {
        post_id: preview.post_id,
        post_type: non_empty(preview.post_type.as_deref())
            .or_else(|| non_empty(query.post_type.as_deref())),
        term_id: preview.term_id,
        taxonomy: non_empty(preview.taxonomy.as_deref()),
        preview_terms: preview.preview_terms.clone(),
        query_kind: None,
        search_term,
        author,
        date_parts: parse_date_parts(
            query.year.as_deref(),
            query.month.as_deref(),
            query.day.as_deref(),
        ),
        query_terms,
        raw_hints: hints,
    }
}

/// Split and percent-decode a query string; a leading `?` is ignored
pub fn parse_query_string(qs: &str) -> Vec<(String, String)> {
    qs.trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " "))
                .map(|v| v.into_owned())
                .unwrap_or_default();
            if key.is_empty() {
                None
            } else {
                Some((key, value))
            }
        })
        .collect()
}

/// Parse date parts; malformed parts are treated as absent
pub fn parse_date_parts(
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
) -> Option<DateParts> {
    let parts = DateParts {
        year: year
            .and_then(|y| y.trim().parse::<i32>().ok())
            .filter(|y| *y > 0),
        month: month
            .and_then(|m| m.trim().parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m)),
        day: day
            .and_then(|d| d.trim().parse::<u32>().ok())
            .filter(|d| (1..=31).contains(d)),
    };

    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

fn insert_hint(hints: &mut BTreeMap<String, String>, key: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        hints.insert(key.to_string(), value.to_lowercase());
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
