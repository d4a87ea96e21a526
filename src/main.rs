use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, warn};

use yokaunit_search::catalog::{Catalog, ToolEntry};
use yokaunit_search::config::{self, Config};
use yokaunit_search::{logging, search};

#[derive(Parser, Debug)]
#[command(name = "yokaunit", version, about = "Search the YokaUnit tool catalog")]
struct Cli {
    /// Configuration file (defaults to the platform config dir)
    #[arg(long, global = true, env = "YOKAUNIT_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog file to search instead of the configured or built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find tools whose title, description, category or tags match
    Search(SearchArgs),
    /// Print the normalized form of a string
    Normalize(NormalizeArgs),
    /// List the catalog
    List(ListArgs),
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Search words; empty lists everything
    query: Vec<String>,

    /// Maximum number of results (at least 1)
    #[arg(long, short = 'n')]
    limit: Option<NonZeroUsize>,

    /// Only tools in this category
    #[arg(long)]
    category: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    text: String,

    /// Normalize as corpus text (lowercased) rather than as a query
    #[arg(long)]
    target: bool,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Only tools in this category
    #[arg(long)]
    category: Option<String>,

    /// Print the catalog as JSON
    #[arg(long)]
    json: bool,
}

/// JSON view of a tool, with the detected language added.
#[derive(Serialize)]
struct ToolView<'a> {
    #[serde(flatten)]
    tool: &'a ToolEntry,
    lang: &'static str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    logging::init(&config.log_level)?;
    for key in &config.unknown_keys {
        warn!("unknown configuration key `{}`", key);
    }
    if let Some(path) = &config.config_path {
        debug!(path = %path.display(), "loaded configuration");
    }

    match cli.command {
        Command::Search(args) => handle_search(args, cli.catalog.as_deref(), &config),
        Command::Normalize(args) => {
            handle_normalize(args);
            Ok(())
        }
        Command::List(args) => handle_list(args, cli.catalog.as_deref(), &config),
    }
}

fn load_catalog(override_path: Option<&Path>, config: &Config) -> Result<Catalog> {
    match override_path.or(config.catalog.as_deref()) {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => Catalog::builtin().context("built-in catalog is invalid"),
    }
}

fn handle_search(args: SearchArgs, catalog_path: Option<&Path>, config: &Config) -> Result<()> {
    let catalog = load_catalog(catalog_path, config)?;
    let query = args.query.join(" ");

    let mut results = catalog.search(&query);
    if let Some(category) = args.category.as_deref() {
        results.retain(|tool| tool.in_category(category));
    }
    results.truncate(args.limit.map_or(config.limit, NonZeroUsize::get));

    if args.json || config.output.json {
        return print_json(&results);
    }

    // Header line, then one tool per line
    if results.is_empty() {
        println!("No tools match \"{}\"", query);
    } else {
        println!("Found {} tool(s) matching \"{}\"", results.len(), query);
    }
    print_rows(&results, config);
    Ok(())
}

fn handle_normalize(args: NormalizeArgs) {
    let normalized = if args.target {
        search::normalize_target(&args.text)
    } else {
        search::normalize_query(&args.text)
    };
    println!("{}", normalized);
}

fn handle_list(args: ListArgs, catalog_path: Option<&Path>, config: &Config) -> Result<()> {
    let catalog = load_catalog(catalog_path, config)?;
    let tools: Vec<&ToolEntry> = match args.category.as_deref() {
        Some(category) => catalog.in_category(category),
        None => catalog.iter().collect(),
    };

    if args.json || config.output.json {
        return print_json(&tools);
    }
    print_rows(&tools, config);
    Ok(())
}

// slug<TAB>title[<TAB>path]
fn print_rows(tools: &[&ToolEntry], config: &Config) {
    for tool in tools {
        if config.output.show_paths {
            println!("{}\t{}\t{}", tool.slug, tool.title, tool.path);
        } else {
            println!("{}\t{}", tool.slug, tool.title);
        }
    }
}

fn print_json(tools: &[&ToolEntry]) -> Result<()> {
    let views: Vec<ToolView> = tools
        .iter()
        .map(|&tool| ToolView {
            tool,
            lang: tool.lang(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&views).context("failed to serialize results")?;
    println!("{}", json);
    Ok(())
}
