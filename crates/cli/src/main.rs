//! ace-breadcrumbs CLI
//!
//! Resolves, classifies, and renders breadcrumb trails from case files, and
//! checks the server and preview renderers against a shared fixture set.

use ace_breadcrumbs_core::{
    classify, config::load_document, format_report, format_trail, normalize, normalize_preview,
    BreadcrumbResolver, FixtureCase, FixtureRunner, HtmlRenderer, LocationDescriptor,
    OutputFormat, PreviewRenderer, RenderOptions, Scenario, TrailLabels,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Breadcrumb trail resolution and rendering
#[derive(Parser)]
#[command(name = "ace-breadcrumbs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Breadcrumb trail resolution - classify a location, build its trail, render markup")]
#[command(long_about = r#"
ace-breadcrumbs: Breadcrumb Trail Resolution

Reads case files (TOML, YAML, or JSON) describing a site snapshot, a render
context, and render options, then classifies the location and produces the
breadcrumb trail.

A render context carries either authoritative live query state
(`[context.query]`) or an editor preview context (`[context.preview]`).

Output formats:
  - JSON (default) - Structured JSON for programmatic use
  - YAML - Human-readable YAML format
  - ANSI - Colored terminal output
  - HTML - nav/ol markup with schema.org microdata
  - Summary - Plain text

Examples:
  ace-breadcrumbs resolve case.toml               # Trail as JSON
  ace-breadcrumbs resolve case.toml -f ansi       # Colored trail
  ace-breadcrumbs render case.toml --separator »  # Server markup
  ace-breadcrumbs preview case.toml               # Editor preview markup
  ace-breadcrumbs check fixtures/                 # Run the fixture set
"#)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Json, global = true)]
    pub format: OutputFormatArg,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Render options file, replacing the case's options
    #[arg(long, global = true)]
    pub options: Option<PathBuf>,

    /// Crumb label overrides file
    #[arg(long, global = true)]
    pub labels: Option<PathBuf>,

    /// Separator between crumbs
    #[arg(long, global = true)]
    pub separator: Option<String>,

    /// Drop the leading home crumb
    #[arg(long, global = true)]
    pub hide_home: bool,

    /// Drop the current crumb
    #[arg(long, global = true)]
    pub hide_current: bool,

    /// Leading label text shown before the trail
    #[arg(long, global = true)]
    pub label: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the trail for a case
    Resolve {
        /// Path to case file
        case: PathBuf,
    },

    /// Show the normalized descriptor and classified scenario
    Classify {
        /// Path to case file
        case: PathBuf,
    },

    /// Render server markup for a case
    Render {
        /// Path to case file
        case: PathBuf,
    },

    /// Render editor preview markup for a case (heuristic path only)
    Preview {
        /// Path to case file
        case: PathBuf,
    },

    /// Run every case under a directory against its expectations
    Check {
        /// Fixture file or directory (recursive)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Number of threads for parallel processing (default: auto)
        #[arg(long)]
        threads: Option<usize>,
    },
}

/// Output format argument
#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Ansi,
    Html,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Ansi => OutputFormat::Ansi,
            OutputFormatArg::Html => OutputFormat::Html,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.output.is_some() || !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    match &args.command {
        Commands::Resolve { case } => run_resolve(case, &args),
        Commands::Classify { case } => run_classify(case, &args),
        Commands::Render { case } => run_render(case, &args),
        Commands::Preview { case } => run_preview(case, &args),
        Commands::Check { path, threads } => run_check(path, *threads, &args),
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "ace_breadcrumbs=debug,ace_breadcrumbs_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_case(path: &Path) -> Result<FixtureCase> {
    let case = FixtureCase::load(path)
        .with_context(|| format!("Failed to load case file: {}", path.display()))?;
    debug!(case = %case.name, "loaded case");
    Ok(case)
}

/// Case options, then the options file, then individual flags
fn build_options(case: &FixtureCase, args: &Args) -> Result<RenderOptions> {
    let mut options = match &args.options {
        Some(path) => load_document(path)
            .with_context(|| format!("Failed to load options file: {}", path.display()))?,
        None => case.options.clone(),
    };

    if let Some(separator) = &args.separator {
        options = options.with_separator(separator);
    }
    if args.hide_home {
        options = options.with_show_home(false);
    }
    if args.hide_current {
        options = options.with_show_current(false);
    }
    if let Some(label) = &args.label {
        options = options.with_label(label);
    }

    Ok(options)
}

fn build_labels(args: &Args) -> Result<TrailLabels> {
    match &args.labels {
        Some(path) => load_document(path)
            .with_context(|| format!("Failed to load labels file: {}", path.display())),
        None => Ok(TrailLabels::default()),
    }
}

fn run_resolve(path: &Path, args: &Args) -> Result<()> {
    let case = load_case(path)?;
    let options = build_options(&case, args)?;
    let resolver = BreadcrumbResolver::new(&case.site).with_labels(build_labels(args)?);

    let trail = resolver.resolve_context(&case.context, &options);
    info!(scenario = trail.scenario.label(), items = trail.items.len(), "resolved");

    let output = format_trail(&trail, args.format.clone().into(), &options)?;
    write_output(&output, args.output.as_ref())
}

fn run_classify(path: &Path, args: &Args) -> Result<()> {
    let case = load_case(path)?;
    let descriptor = normalize(&case.context);
    let scenario = classify(&descriptor);

    let format: OutputFormat = args.format.clone().into();
    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&classification(&descriptor, &scenario))?,
        OutputFormat::Yaml => serde_yaml::to_string(&classification(&descriptor, &scenario))?,
        OutputFormat::Ansi | OutputFormat::Summary | OutputFormat::Html => format!(
            "{} ({})",
            scenario.label(),
            if descriptor.is_authoritative() {
                "authoritative"
            } else {
                "heuristic"
            }
        ),
    };

    write_output(&output, args.output.as_ref())
}

fn classification(descriptor: &LocationDescriptor, scenario: &Scenario) -> serde_json::Value {
    json!({
        "authoritative": descriptor.is_authoritative(),
        "descriptor": descriptor,
        "scenario": scenario,
    })
}

fn run_render(path: &Path, args: &Args) -> Result<()> {
    let case = load_case(path)?;
    let options = build_options(&case, args)?;
    let resolver = BreadcrumbResolver::new(&case.site).with_labels(build_labels(args)?);

    let trail = resolver.resolve_context(&case.context, &options);
    let output = HtmlRenderer::new(&options).render(&trail.items);
    write_output(&output, args.output.as_ref())
}

fn run_preview(path: &Path, args: &Args) -> Result<()> {
    let case = load_case(path)?;
    let options = build_options(&case, args)?;
    let resolver = BreadcrumbResolver::new(&case.site).with_labels(build_labels(args)?);
    debug!(descriptor = ?normalize_preview(&case.context.preview), "preview descriptor");

    let mut preview = PreviewRenderer::new(resolver, options);
    let format: OutputFormat = args.format.clone().into();
    let output = match format {
        OutputFormat::Html => preview.render(&case.context.preview).to_string(),
        other => {
            let trail = preview.trail(&case.context.preview).clone();
            format_trail(&trail, other, preview.options())?
        }
    };

    write_output(&output, args.output.as_ref())
}

fn run_check(path: &Path, threads: Option<usize>, args: &Args) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    // Show progress spinner
    let spinner = if args.verbose && atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Running fixtures...");
        Some(pb)
    } else {
        None
    };

    let mut runner = FixtureRunner::new(path.to_path_buf());
    if let Some(threads) = threads {
        runner = runner.with_threads(threads);
    }
    let report = runner.run().context("Failed to run fixtures")?;

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!(
            "Ran {} cases in {}ms",
            report.stats.total_cases, report.metadata.duration_ms
        ));
    }

    let output = format_report(&report, args.format.clone().into())?;
    write_output(&output, args.output.as_ref())?;

    if !report.all_passed() {
        anyhow::bail!(
            "{} of {} cases failed, {} files could not be loaded",
            report.stats.failed,
            report.stats.total_cases,
            report.stats.load_errors
        );
    }

    Ok(())
}

fn write_output(output: &str, path: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, output).context("Failed to write output file")?;
    } else {
        println!("{}", output);
    }
    Ok(())
}
