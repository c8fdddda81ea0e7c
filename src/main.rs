//! kgrep - grep for Kubernetes manifests
//!
//! Reads YAML streams (files or stdin), flattens `List` documents, and prints
//! the resources matching the given kind, name, namespace and label filters.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kgrep::cli::{self, ConfigSubcommand};
use kgrep::config::{Config, ConfigLoader};
use kgrep::{
    grep_resources, GrepError, GrepOptions, GrepStats, LabelSelector, MatchMode, OutputMode,
    Selector,
};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// kgrep - filter Kubernetes resources out of YAML manifests
#[derive(Parser, Debug)]
#[command(name = "kgrep")]
#[command(about = "Filter Kubernetes resources out of YAML manifests", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    /// Input files; reads stdin when none are given or for "-"
    files: Vec<PathBuf>,

    /// Only resources of this kind
    #[arg(long, short = 'k')]
    kind: Option<String>,

    /// Only resources with this name
    #[arg(long, short = 'n')]
    name: Option<String>,

    /// Only resources in this namespace
    #[arg(long = "namespace", short = 'N')]
    namespace: Option<String>,

    /// Label selector (e.g. "app=web,tier!=cache,env in (prod,staging)")
    #[arg(long = "selector", short = 'l')]
    labels: Option<String>,

    /// Output mode (defaults to the configured one)
    #[arg(long, short = 'o', value_enum)]
    output: Option<OutputMode>,

    /// Print resources that do NOT match
    #[arg(long, short = 'v')]
    invert_match: bool,

    /// Leave the Kind/ prefix out of summary and name lines
    #[arg(long)]
    omit_kind: bool,

    /// Treat kind, name and namespace filters as regular expressions
    #[arg(long, short = 'E')]
    regex: bool,

    /// Enable debug logging to stderr
    #[arg(long, short = 'd')]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let mut args = Args::parse();

    match args.command.take() {
        Some(Command::Config { subcommand }) => return cli::handle_config_command(subcommand),
        Some(Command::Version) => {
            cli::display_version();
            return Ok(());
        }
        None => {}
    }

    let config = ConfigLoader::load().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}; using default configuration", e);
        ConfigLoader::load_defaults()
    });

    cli::init_logging(args.debug, &config.logger.level);
    tracing::debug!("Configuration loaded: {:?}", config);

    match run(&args, &config) {
        Err(e) if is_broken_pipe(&e) => Ok(()),
        other => other,
    }
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let selector = build_selector(args, config)?;
    let mode = args.output.unwrap_or(config.output);
    let options = GrepOptions {
        invert_match: args.invert_match,
        omit_kind: args.omit_kind || config.omit_kind,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut total = GrepStats::default();

    let stdin_only = [PathBuf::from("-")];
    let inputs = if args.files.is_empty() {
        &stdin_only[..]
    } else {
        &args.files[..]
    };

    for path in inputs {
        let input = open_input(path)?;
        let stats = grep_resources(&selector, input, &mut out, mode, options)
            .with_context(|| format!("Failed to process {}", path.display()))?;
        total.documents += stats.documents;
        total.resources += stats.resources;
        total.matched += stats.matched;
    }

    out.flush().context("Failed to write output")?;

    tracing::debug!(
        "Done: {} documents, {} resources, {} matched",
        total.documents,
        total.resources,
        total.matched
    );

    Ok(())
}

fn build_selector(args: &Args, config: &Config) -> Result<Selector> {
    let match_mode = if args.regex {
        MatchMode::Regex
    } else {
        config.match_mode
    };

    let labels = match &args.labels {
        Some(labels) => LabelSelector::parse(labels)?,
        None => LabelSelector::default(),
    };

    let mut builder = Selector::builder().match_mode(match_mode).labels(labels);
    if let Some(kind) = &args.kind {
        builder = builder.kind(kind.as_str());
    }
    if let Some(name) = &args.name {
        builder = builder.name(name.as_str());
    }
    if let Some(namespace) = &args.namespace {
        builder = builder.namespace(namespace.as_str());
    }

    Ok(builder.build()?)
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(Box::new(file))
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<GrepError>()
            .is_some_and(GrepError::is_broken_pipe)
            || cause
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}
