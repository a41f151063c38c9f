//! Memento CLI - build, search and render knowledge graphs

mod scenario;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use memento_core::config::Config;
use memento_core::embedding::create_provider;
use memento_core::graph::GraphStore;
use memento_core::visualization::{
    OutputFormat, ReportOptions, parse_export, render, render_cypher, render_export, render_mermaid,
};
use tracing::info;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "memento")]
#[command(author, version, about = "Multi-scale knowledge graph engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Where the graph comes from
#[derive(clap::Args)]
struct GraphSource {
    /// Built-in scenario to build
    #[arg(short, long, value_enum, default_value_t = Scenario::Basic)]
    scenario: Scenario,

    /// Restore from a JSON export instead of building a scenario
    #[arg(short, long, conflicts_with = "scenario")]
    input: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Report,
    Json,
    Mermaid,
    Cypher,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Report => OutputFormat::Report,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Mermaid => OutputFormat::Mermaid,
            FormatArg::Cypher => OutputFormat::Cypher,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scenario and print the layered report
    Demo {
        #[arg(short, long, value_enum, default_value_t = Scenario::Basic)]
        scenario: Scenario,
    },

    /// Render a graph in one output format
    Render {
        #[arg(short, long, value_enum, default_value_t = FormatArg::Report)]
        format: FormatArg,
        #[command(flatten)]
        source: GraphSource,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write graph.json, graph.mmd and graph.cypher
    Export {
        #[command(flatten)]
        source: GraphSource,
        /// Output directory (defaults to output.directory from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Find the mementos most similar to a query
    Search {
        /// Query text
        query: String,
        /// Number of results (defaults to search.default_top_k from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        #[command(flatten)]
        source: GraphSource,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "memento=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Demo { scenario } => cmd_demo(scenario).await,

        Commands::Render {
            format,
            source,
            output,
        } => cmd_render(format.into(), &source, output.as_deref(), cli.quiet).await,

        Commands::Export { source, dir } => cmd_export(&source, dir, cli.quiet).await,

        Commands::Search {
            query,
            top_k,
            source,
        } => cmd_search(&query, top_k, &source).await,

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<memento_core::Error>() {
        Some(core) => {
            eprintln!("Error [{}]: {}", core.code(), core);
            if let Some(hint) = core.suggestion() {
                eprintln!("Hint: {}", hint);
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn load_graph(config: &Config, source: &GraphSource) -> anyhow::Result<GraphStore> {
    let provider = create_provider(&config.embedding)?;

    match &source.input {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read export: {}", path.display()))?;
            let store = GraphStore::restore(parse_export(&json)?, provider)?;
            info!(path = %path.display(), "Graph restored from export");
            Ok(store)
        }
        None => Ok(scenario::build(source.scenario, provider).await?),
    }
}

fn report_options(config: &Config) -> ReportOptions {
    ReportOptions {
        example_queries: config.search.example_queries.clone(),
        top_k: config.search.default_top_k,
    }
}

async fn cmd_demo(scenario: Scenario) -> anyhow::Result<()> {
    let config = Config::load()?;
    let source = GraphSource {
        scenario,
        input: None,
    };
    let store = load_graph(&config, &source).await?;
    print!("{}", render(&store, OutputFormat::Report, &report_options(&config))?);
    Ok(())
}

async fn cmd_render(
    format: OutputFormat,
    source: &GraphSource,
    output: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = load_graph(&config, source).await?;
    let rendered = render(&store, format, &report_options(&config))?;

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                println!("Wrote {} ({})", path.display(), format);
            }
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

async fn cmd_export(source: &GraphSource, dir: Option<PathBuf>, quiet: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = load_graph(&config, source).await?;
    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.output.directory));

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let outputs = [
        ("graph.json", render_export(&store)?, "structured data"),
        ("graph.mmd", render_mermaid(&store), "Mermaid diagram"),
        ("graph.cypher", render_cypher(&store), "Cypher load script"),
    ];
    for (name, contents, description) in outputs {
        let path = dir.join(name);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !quiet {
            println!("Saved: {} ({})", path.display(), description);
        }
    }
    Ok(())
}

async fn cmd_search(query: &str, top_k: Option<usize>, source: &GraphSource) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = load_graph(&config, source).await?;
    let top_k = top_k.unwrap_or(config.search.default_top_k);

    let hits = store.find_similar(query, top_k)?;
    println!("Query: '{}'", query);
    if hits.is_empty() {
        println!("  (no results)");
    }
    for hit in hits {
        println!(
            "  [{}] ({:.3}) {}",
            hit.memento.id, hit.score, hit.memento.content
        );
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let path = Config::config_path()?;
            let mut config = Config::load_from(&path)?;
            config.set(&key, &value)?;
            config.save_to(&path)?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
