//! Scenario classification
//!
//! Two strictly separate paths decide which [`Scenario`] a descriptor
//! describes. The authoritative path trusts `query_kind` and never looks at
//! hints. The speculative path serves editor previews and works from
//! whatever identifiers and hint strings the normalizer collected; it is
//! allowed to be approximate.

use crate::context::QueryFlags;
use crate::models::{AuthorRef, LocationDescriptor, QueryKind, Scenario, TermTarget};
use crate::trail::humanize;
use tracing::debug;

/// Live-query precedence, first match wins
const QUERY_PRECEDENCE: &[(fn(&QueryFlags) -> bool, QueryKind)] = &[
    (|f: &QueryFlags| f.is_front_page, QueryKind::FrontPage),
    (|f: &QueryFlags| f.is_home, QueryKind::BlogIndex),
    (|f: &QueryFlags| f.is_singular, QueryKind::Singular),
    (|f: &QueryFlags| f.is_category, QueryKind::TermArchive),
    (|f: &QueryFlags| f.is_tag, QueryKind::TermArchive),
    (|f: &QueryFlags| f.is_tax, QueryKind::TermArchive),
    (|f: &QueryFlags| f.is_post_type_archive, QueryKind::PostTypeArchive),
    (|f: &QueryFlags| f.is_search, QueryKind::Search),
    (|f: &QueryFlags| f.is_author, QueryKind::Author),
    (|f: &QueryFlags| f.is_date, QueryKind::DateArchive),
    (|f: &QueryFlags| f.is_404, QueryKind::NotFound),
];

impl QueryFlags {
    /// Reduce the flag set to a single query kind
    pub fn kind(&self) -> Option<QueryKind> {
        QUERY_PRECEDENCE
            .iter()
            .find(|(test, _)| test(self))
            .map(|(_, kind)| *kind)
    }
}

/// Keyword groups checked on the speculative path, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HintGroup {
    Search,
    Author,
    ExplicitTaxonomy,
    Tag,
    Category,
    Archive,
}

const HINT_PRIORITY: &[HintGroup] = &[
    HintGroup::Search,
    HintGroup::Author,
    HintGroup::ExplicitTaxonomy,
    HintGroup::Tag,
    HintGroup::Category,
    HintGroup::Archive,
];

/// Fuzzy keyword match tolerant of template-slug naming variance.
///
/// `candidate` matches when it equals `keyword`, starts with `keyword-`, or
/// ends with `-keyword`. Unrelated slugs that happen to share an affix
/// match too.
pub fn hint_matches(candidate: &str, keyword: &str) -> bool {
    if candidate.is_empty() || keyword.is_empty() {
        return false;
    }
    candidate == keyword
        || candidate
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.starts_with('-'))
        || candidate
            .strip_suffix(keyword)
            .is_some_and(|rest| rest.ends_with('-'))
}

/// Classify a descriptor into a scenario; never fails
pub fn classify(descriptor: &LocationDescriptor) -> Scenario {
    let scenario = match descriptor.query_kind {
        Some(kind) => classify_authoritative(kind, descriptor),
        None => classify_speculative(descriptor),
    };
    debug!(
        authoritative = descriptor.is_authoritative(),
        scenario = scenario.label(),
        "classified location"
    );
    scenario
}

fn classify_authoritative(kind: QueryKind, d: &LocationDescriptor) -> Scenario {
    match kind {
        QueryKind::FrontPage => Scenario::FrontPage,
        QueryKind::BlogIndex => Scenario::BlogIndex,
        QueryKind::Singular => match d.post_id {
            Some(post_id) => singular(post_id, d.post_type.as_deref()),
            None => Scenario::Default,
        },
        QueryKind::TermArchive => match (d.term_id, &d.taxonomy) {
            (Some(id), Some(taxonomy)) => Scenario::TermArchive {
                term: TermTarget::Id(id),
                taxonomy: taxonomy.clone(),
            },
            _ => Scenario::Default,
        },
        QueryKind::PostTypeArchive => match &d.post_type {
            Some(post_type) => Scenario::PostTypeArchive {
                post_type: post_type.clone(),
            },
            None => Scenario::Default,
        },
        QueryKind::Search => Scenario::Search {
            term: d.search_term.clone().unwrap_or_default(),
        },
        QueryKind::Author => match &d.author {
            Some(author) => Scenario::Author {
                author: author.clone(),
            },
            None => Scenario::Default,
        },
        QueryKind::DateArchive => match d.date_parts {
            Some(parts) if !parts.is_empty() => Scenario::DateArchive {
                year: parts.year,
                month: parts.month,
                day: parts.day,
            },
            _ => Scenario::Default,
        },
        QueryKind::NotFound => Scenario::NotFound,
    }
}

fn singular(post_id: u64, post_type: Option<&str>) -> Scenario {
    match post_type.unwrap_or("post") {
        "page" => Scenario::SingularPage { post_id },
        "post" => Scenario::SingularPost { post_id },
        other => Scenario::SingularCustomType {
            post_id,
            post_type: other.to_string(),
        },
    }
}

fn classify_speculative(d: &LocationDescriptor) -> Scenario {
    // 1. Strong identifiers
    if let Some(post_id) = d.post_id {
        return singular(post_id, d.post_type.as_deref());
    }

    // 2. Explicit term, then the first preview term
    if let (Some(term_id), Some(taxonomy)) = (d.term_id, &d.taxonomy) {
        return Scenario::TermArchive {
            term: TermTarget::Id(term_id),
            taxonomy: taxonomy.clone(),
        };
    }
    if let Some(first) = d.preview_terms.first() {
        return Scenario::TermArchive {
            term: TermTarget::Id(first.term_id),
            taxonomy: first.taxonomy.clone(),
        };
    }

    // 3. Keyword matching over collected hints
    let hints = HintSet::from_descriptor(d);
    for group in HINT_PRIORITY {
        if let Some(scenario) = hints.match_group(*group, d) {
            return scenario;
        }
    }

    // 4. Inherited query-context fields
    if let Some(term) = &d.search_term {
        return Scenario::Search { term: term.clone() };
    }
    if let Some(author) = &d.author {
        return Scenario::Author {
            author: author.clone(),
        };
    }
    if let Some(taxonomy) = &d.taxonomy {
        return Scenario::TermArchive {
            term: d.term_id.map(TermTarget::Id).unwrap_or(TermTarget::Unknown),
            taxonomy: taxonomy.clone(),
        };
    }
    if let Some(filter) = &d.query_terms {
        return Scenario::TermArchive {
            term: filter
                .terms
                .first()
                .copied()
                .map(TermTarget::Id)
                .unwrap_or(TermTarget::Unknown),
            taxonomy: filter.taxonomy.clone(),
        };
    }
    if let Some(parts) = d.date_parts.filter(|p| !p.is_empty()) {
        return Scenario::DateArchive {
            year: parts.year,
            month: parts.month,
            day: parts.day,
        };
    }
    if let Some(post_type) = &d.post_type {
        return Scenario::PostTypeArchive {
            post_type: post_type.clone(),
        };
    }

    // 5. Nothing to go on
    Scenario::Default
}

/// Candidate strings extracted from raw hints
struct HintSet<'a> {
    /// Template slug and URL path segments
    candidates: Vec<&'a str>,
    /// URL path segments in order
    segments: Vec<&'a str>,
}

impl<'a> HintSet<'a> {
    fn from_descriptor(d: &'a LocationDescriptor) -> Self {
        let segments: Vec<&str> = d
            .hint("path")
            .map(|p| p.split('/').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let mut candidates = Vec::new();
        if let Some(template) = d.hint("template") {
            candidates.push(template);
        }
        candidates.extend(segments.iter().copied());

        Self {
            candidates,
            segments,
        }
    }

    fn any_matches(&self, keyword: &str) -> Option<&'a str> {
        self.candidates
            .iter()
            .copied()
            .find(|c| hint_matches(c, keyword))
    }

    /// Path segment directly following `keyword`
    fn segment_after(&self, keyword: &str) -> Option<&'a str> {
        self.segments
            .iter()
            .position(|s| *s == keyword)
            .and_then(|idx| self.segments.get(idx + 1).copied())
    }

    fn match_group(&self, group: HintGroup, d: &LocationDescriptor) -> Option<Scenario> {
        match group {
            HintGroup::Search => {
                if self.any_matches("search").is_none() && d.hint("arg.s").is_none() {
                    return None;
                }
                let term = d
                    .search_term
                    .as_deref()
                    .or_else(|| d.hint("arg.s"))
                    .or_else(|| self.segment_after("search"))
                    .unwrap_or_default();
                Some(Scenario::Search {
                    term: term.to_string(),
                })
            }
            HintGroup::Author => {
                let arg = d.hint("arg.author_name").or_else(|| d.hint("arg.author"));
                if self.any_matches("author").is_none() && arg.is_none() {
                    return None;
                }
                let author = d.author.clone().unwrap_or_else(|| {
                    let name = arg.or_else(|| self.segment_after("author")).unwrap_or_default();
                    match name.parse::<u64>() {
                        Ok(id) => AuthorRef::Id(id),
                        Err(_) => AuthorRef::Name(humanize(name)),
                    }
                });
                Some(Scenario::Author { author })
            }
            HintGroup::ExplicitTaxonomy => {
                let taxonomy = d
                    .hint("taxonomy")
                    .or_else(|| d.hint("arg.taxonomy"))
                    .or_else(|| d.hint("preview_taxonomy"))?;
                let term = d
                    .hint("arg.term")
                    .or_else(|| self.segment_after(taxonomy))
                    .map(|slug| TermTarget::Slug(slug.to_string()))
                    .unwrap_or(TermTarget::Unknown);
                Some(Scenario::TermArchive {
                    term,
                    taxonomy: taxonomy.to_string(),
                })
            }
            HintGroup::Tag => {
                let arg = d.hint("arg.tag");
                if self.any_matches("tag").is_none() && arg.is_none() {
                    return None;
                }
                Some(Scenario::TermArchive {
                    term: slug_target(arg.or_else(|| self.segment_after("tag"))),
                    taxonomy: "post_tag".to_string(),
                })
            }
            HintGroup::Category => {
                let arg = d.hint("arg.category_name");
                if self.any_matches("category").is_none() && arg.is_none() {
                    return None;
                }
                Some(Scenario::TermArchive {
                    term: slug_target(arg.or_else(|| self.segment_after("category"))),
                    taxonomy: "category".to_string(),
                })
            }
            HintGroup::Archive => {
                let matched = self.any_matches("archive")?;
                let post_type = d
                    .post_type
                    .as_deref()
                    .or_else(|| d.hint("arg.post_type"))
                    .or_else(|| archive_affix(matched))
                    .unwrap_or("post");
                Some(Scenario::PostTypeArchive {
                    post_type: post_type.to_string(),
                })
            }
        }
    }
}

fn slug_target(slug: Option<&str>) -> TermTarget {
    slug.map(|s| TermTarget::Slug(s.to_string()))
        .unwrap_or(TermTarget::Unknown)
}

/// Post type named around an archive slug: `archive-product`, `product-archive`
fn archive_affix(candidate: &str) -> Option<&str> {
    candidate
        .strip_prefix("archive-")
        .or_else(|| candidate.strip_suffix("-archive"))
        .filter(|rest| !rest.is_empty())
}
