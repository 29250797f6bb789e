//! Canopy CLI - check, lay out, export and serve cloud inventories.

#![allow(clippy::needless_pass_by_value, clippy::doc_markdown)]

mod render;
mod serve;

use canopy::config::ConfigError;
use canopy::{read_path, write_records, Hierarchy, LoadError, ViewerConfig, ViewerError};
use clap::{Parser, Subcommand};
use render::LayoutRequest;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "canopy")]
#[command(about = "Cloud-inventory hierarchy viewer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an inventory and print a summary
    Check {
        /// Inventory CSV (no header, 7 columns)
        csv: PathBuf,

        /// Viewer config (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Compute one layout and print its geometry as JSON
    Layout {
        /// Inventory CSV
        csv: PathBuf,

        /// Layout id (collapsible-tree, force-graph, sunburst, circle-pack,
        /// circle-pack-colored, treemap)
        #[arg(short, long, default_value = "collapsible-tree")]
        kind: String,

        /// Toggle this node before laying out (repeatable)
        #[arg(short, long)]
        toggle: Vec<String>,

        /// Expand every node before applying toggles
        #[arg(long)]
        expand_all: bool,

        /// Viewer config (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the inventory back as normalized CSV
    Export {
        /// Inventory CSV
        csv: PathBuf,

        /// Keep only the configured categories and resource types
        #[arg(short, long)]
        filter: bool,

        /// Viewer config (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the inventory, its layouts and icons over HTTP
    Serve {
        /// Inventory CSV
        csv: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Directory served under /icons/
        #[arg(short, long, default_value = "icons")]
        icons: PathBuf,

        /// Viewer config (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Anything that stops a command.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Viewer(#[from] ViewerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("server error: {0}")]
    Server(String),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Check { csv, config } => check(&csv, config.as_deref()),
        Commands::Layout {
            csv,
            kind,
            toggle,
            expand_all,
            config,
            output,
        } => {
            let request = LayoutRequest {
                kind,
                toggles: toggle,
                expand_all,
            };
            layout(&csv, &request, config.as_deref(), output.as_deref())
        }
        Commands::Export {
            csv,
            filter,
            config,
            output,
        } => export(&csv, filter, config.as_deref(), output.as_deref()),
        Commands::Serve {
            csv,
            port,
            icons,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let tree = load_tree(&csv, &config)?;
            let site = serve::Site::new(config, tree, icons)?;
            serve::run(&site, port)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig, CliError> {
    match path {
        Some(path) => Ok(ViewerConfig::load(path)?),
        None => Ok(ViewerConfig::default()),
    }
}

fn load_tree(csv: &Path, config: &ViewerConfig) -> Result<Hierarchy, CliError> {
    let records = read_path(csv, &config.row_parser())?;
    let tree = config.hierarchy_builder().build(records)?;
    tracing::debug!(path = %csv.display(), nodes = tree.len(), "inventory loaded");
    Ok(tree)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, CliError> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn check(csv: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config)?;
    let tree = load_tree(csv, &config)?;
    let root = tree.node(tree.root());

    let mut types: BTreeMap<&str, usize> = BTreeMap::new();
    for record in tree.records() {
        *types.entry(record.resource_type.as_str()).or_default() += 1;
    }

    println!("Inventory valid: {}", csv.display());
    println!("  Nodes: {}", tree.len());
    println!("  Root: {} ({})", root.id(), root.display_name());
    println!("  Height: {}", tree.height(tree.root()));
    println!("  Types:");
    for (resource_type, count) in types {
        println!("    {resource_type}: {count}");
    }
    Ok(())
}

fn layout(
    csv: &Path,
    request: &LayoutRequest,
    config: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let tree = load_tree(csv, &config)?;
    let frame = request.render(&config, tree)?;

    let mut out = open_output(output)?;
    serde_json::to_writer_pretty(&mut out, &frame)?;
    writeln!(out)?;
    out.flush()?;
    tracing::info!(layout = %frame.kind, nodes = frame.geometry.node_count(), "layout written");
    Ok(())
}

fn export(
    csv: &Path,
    filter: bool,
    config: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let mut records = read_path(csv, &config.row_parser())?;
    if filter {
        records = config.record_filter().unwrap_or_default().apply(records);
    }

    let mut out = open_output(output)?;
    write_records(&mut out, &records)?;
    out.flush()?;
    tracing::info!(rows = records.len(), "inventory exported");
    Ok(())
}
