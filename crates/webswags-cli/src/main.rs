//! webswags CLI entrypoint
//! Discovers spec documents and either serves them through the web UI or lists them.

// Internal imports (std, crate)
use std::path::PathBuf;

mod pages;
mod proxy;
mod server;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use openapiv3::ReferenceOr;
use tracing_subscriber::EnvFilter;
use webswags_core::{discover_async, Config, Discovery, SpecDocument};

#[derive(Parser)]
#[command(name = "webswags")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Discover spec documents and serve them through the web UI
    Serve {
        /// Directory searched recursively for spec documents (default: ..)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Address to bind (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: 8085)
        #[arg(long)]
        port: Option<u16>,
        /// YAML configuration file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the discovered spec documents
    List {
        /// Directory searched recursively for spec documents (default: ..)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Print the records as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// YAML configuration file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is kept for `list` output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Serve {
            root,
            host,
            port,
            config,
        } => {
            let mut config = load_config(config.as_ref()).await?;
            if let Some(root) = root {
                config.root_dir = root.clone();
            }
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }

            let discovery = Discovery::new(
                discover_async(config.root_dir.clone())
                    .await
                    .with_context(|| {
                        format!("Failed to discover specs under {}", config.root_dir.display())
                    })?,
            );

            for spec in discovery.specs() {
                tracing::info!(
                    service = %spec.service,
                    format = %spec.format,
                    kind = %spec.schema_kind(),
                    path = %spec.path.display(),
                    "Discovered service"
                );
            }
            for (service, paths) in discovery.duplicate_services() {
                tracing::warn!(
                    service,
                    count = paths.len(),
                    "Service key shared by several documents; lookups use the first"
                );
            }

            server::run(&config, discovery).await?;
        }
        Commands::List { root, json, config } => {
            let mut config = load_config(config.as_ref()).await?;
            if let Some(root) = root {
                config.root_dir = root.clone();
            }

            let specs = discover_async(config.root_dir.clone())
                .await
                .with_context(|| {
                    format!("Failed to discover specs under {}", config.root_dir.display())
                })?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&specs)?);
            } else {
                print_table(&specs);
            }
        }
    }

    Ok(())
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn print_table(specs: &[SpecDocument]) {
    if specs.is_empty() {
        println!("No spec documents found");
        return;
    }

    println!(
        "{:<28} {:<10} {:<8} {:<5} {:>4}  PATH",
        "SERVICE", "KIND", "VERSION", "FMT", "OPS"
    );
    for spec in specs {
        let ops = operation_count(spec)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:<10} {:<8} {:<5} {:>4}  {}",
            spec.service,
            spec.schema_kind(),
            spec.version_string(),
            spec.format,
            ops,
            spec.path.display()
        );
    }
}

/// Operations declared by an OpenAPI 3 document; `None` for Swagger 2 or
/// documents the typed model rejects
fn operation_count(spec: &SpecDocument) -> Option<usize> {
    let typed = spec.openapi_document()?.typed().ok()?;
    let count = typed
        .paths
        .paths
        .values()
        .filter_map(|item| match item {
            ReferenceOr::Item(item) => Some(item),
            ReferenceOr::Reference { .. } => None,
        })
        .map(|item| {
            [
                &item.get,
                &item.put,
                &item.post,
                &item.delete,
                &item.options,
                &item.head,
                &item.patch,
                &item.trace,
            ]
            .iter()
            .filter(|op| op.is_some())
            .count()
        })
        .sum();
    Some(count)
}
