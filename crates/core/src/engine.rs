//! Breadcrumb resolution engine
//!
//! This module provides the resolver entry point that chains
//! classification, trail building, and formatting, plus a fixture runner
//! that checks server and preview output against a shared case set.

use crate::classifier::classify;
use crate::config::{is_document_path, load_document, ConfigError, RenderOptions, TrailLabels};
use crate::context::{normalize, normalize_preview, RenderContext};
use crate::formatter::{ItemFormatter, TrailFilter};
use crate::models::{BreadcrumbItem, LocationDescriptor, ResolvedTrail};
use crate::site::{SiteGraph, SiteSnapshot};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Fixture runner errors
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Resolves locations into finalized breadcrumb trails.
///
/// Holds no per-request state: the same resolver can serve any number of
/// resolutions and returns identical output for identical descriptors.
pub struct BreadcrumbResolver<S: SiteGraph> {
    site: S,
    labels: TrailLabels,
    filters: Vec<Box<dyn TrailFilter>>,
}

impl<S: SiteGraph> BreadcrumbResolver<S> {
    /// Create a resolver over the given site collaborator
    pub fn new(site: S) -> Self {
        Self {
            site,
            labels: TrailLabels::default(),
            filters: Vec::new(),
        }
    }

    /// Set crumb labels (builder pattern)
    pub fn with_labels(mut self, labels: TrailLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Subscribe a trail transformer (builder pattern)
    pub fn with_filter(mut self, filter: impl TrailFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    pub fn labels(&self) -> &TrailLabels {
        &self.labels
    }

    /// Resolve a descriptor with default render options
    pub fn resolve(&self, descriptor: &LocationDescriptor) -> Vec<BreadcrumbItem> {
        self.resolve_with(descriptor, &RenderOptions::default())
    }

    /// Resolve a descriptor, honoring visibility toggles
    pub fn resolve_with(
        &self,
        descriptor: &LocationDescriptor,
        options: &RenderOptions,
    ) -> Vec<BreadcrumbItem> {
        self.resolve_trail(descriptor, options).items
    }

    /// Resolve a descriptor and keep the classified scenario alongside
    pub fn resolve_trail(
        &self,
        descriptor: &LocationDescriptor,
        options: &RenderOptions,
    ) -> ResolvedTrail {
        let descriptor = self.enrich(descriptor);
        let scenario = classify(&descriptor);
        let raw = crate::trail::TrailBuilder::new(&self.site, &self.labels).build(&scenario);
        let items = ItemFormatter::new(&self.filters).format(raw, &descriptor, options);
        debug!(scenario = scenario.label(), items = items.len(), "resolved trail");
        ResolvedTrail { scenario, items }
    }

    /// Normalize a render context, then resolve it
    pub fn resolve_context(&self, context: &RenderContext, options: &RenderOptions) -> ResolvedTrail {
        self.resolve_trail(&normalize(context), options)
    }

    /// Fill in a missing post type or taxonomy for explicit ids
    fn enrich(&self, descriptor: &LocationDescriptor) -> LocationDescriptor {
        let mut enriched = descriptor.clone();
        if let (Some(post_id), None) = (enriched.post_id, &enriched.post_type) {
            enriched.post_type = self.site.post_type_of(post_id);
        }
        if let (Some(term_id), None) = (enriched.term_id, &enriched.taxonomy) {
            enriched.taxonomy = self.site.term_taxonomy(term_id);
        }
        enriched
    }
}

/// One case of the shared fixture set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    pub name: String,

    #[serde(default)]
    pub site: SiteSnapshot,

    #[serde(default)]
    pub context: RenderContext,

    #[serde(default)]
    pub options: RenderOptions,

    /// Expected server trail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<Vec<BreadcrumbItem>>,

    /// Expected preview trail, when it is allowed to differ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_preview: Option<Vec<BreadcrumbItem>>,
}

impl FixtureCase {
    /// Load a case from a TOML, YAML, or JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_document(path)
    }

    /// Resolve the server trail and the speculative preview trail
    pub fn run(&self) -> CaseOutcome {
        let resolver = BreadcrumbResolver::new(&self.site);
        let server = resolver.resolve_context(&self.context, &self.options);
        let preview = resolver.resolve_trail(&normalize_preview(&self.context.preview), &self.options);

        let server_ok = self
            .expect
            .as_ref()
            .map_or(true, |expected| items_match(expected, &server.items));
        let preview_ok = self
            .expect_preview
            .as_ref()
            .map_or(true, |expected| items_match(expected, &preview.items));

        CaseOutcome {
            name: self.name.clone(),
            passed: server_ok && preview_ok,
            same_shape: same_shape(&server.items, &preview.items),
            server,
            preview,
        }
    }
}

/// Labels, URLs, and current flags agree; crumb kinds are informational
fn items_match(expected: &[BreadcrumbItem], actual: &[BreadcrumbItem]) -> bool {
    expected.len() == actual.len()
        && expected.iter().zip(actual).all(|(e, a)| {
            e.label == a.label && e.url == a.url && e.is_current == a.is_current
        })
}

/// Same length and same current position
fn same_shape(a: &[BreadcrumbItem], b: &[BreadcrumbItem]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.is_current == y.is_current)
}

/// Result of running one fixture case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub name: String,
    pub passed: bool,
    /// Whether the preview trail is structurally analogous to the server one
    pub same_shape: bool,
    pub server: ResolvedTrail,
    pub preview: ResolvedTrail,
}

/// Summary statistics for a fixture run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureStats {
    pub total_cases: usize,
    pub passed: usize,
    pub failed: usize,
    pub divergent_previews: usize,
    /// Files that could not be loaded
    pub load_errors: usize,
}

/// Metadata about the fixture run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub duration_ms: u64,
    pub cases_per_second: f64,
    pub timestamp: String,
    pub tool_version: String,
}

/// Complete fixture run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureReport {
    pub root: PathBuf,
    pub cases: Vec<CaseOutcome>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub stats: FixtureStats,
    pub metadata: RunMetadata,
}

impl FixtureReport {
    pub fn all_passed(&self) -> bool {
        self.stats.failed == 0 && self.stats.load_errors == 0
    }
}

/// Runs every fixture case found under a directory
pub struct FixtureRunner {
    root: PathBuf,
    threads: usize,
}

impl FixtureRunner {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            threads: num_cpus(),
        }
    }

    /// Set number of threads (builder pattern)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Load and run all cases
    pub fn run(&self) -> Result<FixtureReport, FixtureError> {
        let start = Instant::now();

        let files = self.find_case_files();
        let mut cases = Vec::new();
        let mut errors = Vec::new();
        for path in files {
            match FixtureCase::load(&path) {
                Ok(case) => cases.push(case),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable fixture");
                    errors.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        let outcomes: Vec<CaseOutcome> = if self.threads == 1 {
            cases.iter().map(FixtureCase::run).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| FixtureError::ThreadPoolError(e.to_string()))?;
            pool.install(|| cases.par_iter().map(FixtureCase::run).collect())
        };

        let passed = outcomes.iter().filter(|o| o.passed).count();
        let stats = FixtureStats {
            total_cases: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
            divergent_previews: outcomes.iter().filter(|o| !o.same_shape).count(),
            load_errors: errors.len(),
        };

        let duration = start.elapsed();
        let metadata = RunMetadata {
            duration_ms: duration.as_millis() as u64,
            cases_per_second: if duration.as_secs_f64() > 0.0 {
                outcomes.len() as f64 / duration.as_secs_f64()
            } else {
                outcomes.len() as f64
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok(FixtureReport {
            root: self.root.clone(),
            cases: outcomes,
            errors,
            stats,
            metadata,
        })
    }

    /// Case files under the root, in a stable order
    fn find_case_files(&self) -> Vec<PathBuf> {
        if self.root.is_file() {
            return vec![self.root.clone()];
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_document_path(p))
            .collect();
        files.sort();
        files
    }
}

/// Get number of available CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}
