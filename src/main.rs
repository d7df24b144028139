//! Geolink CLI - Bilingual catalog relationship service

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use geolink::analytics::MemorySink;
use geolink::config;
use geolink::service::{CatalogService, ServiceSettings};
use geolink::NdjsonCatalog;

#[derive(Parser)]
#[command(name = "geolink")]
#[command(version = "0.1.0")]
#[command(about = "Bilingual metadata catalog relationship resolver")]
#[command(long_about = r#"
Geolink resolves hierarchical relationships (self, parent, children,
siblings) over a materialized catalog snapshot and serves bilingual
(English/French) JSON responses, with snapshot and result caching.

Example usage:
  geolink serve --snapshot records.ndjson --port 3000
  geolink related --snapshot records.ndjson --id abc-123 --lang en
  geolink detail --snapshot records.ndjson --id abc-123 --lang fr
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a geolink.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the relationship and detail endpoints over HTTP
    Serve {
        /// Path to the NDJSON snapshot materialization
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Resolve relationships for one record id
    Related {
        /// Record id to look up
        #[arg(short, long)]
        id: String,

        /// Response language (en or fr)
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Path to the NDJSON snapshot materialization
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Show the full bilingual detail projection for one record id
    Detail {
        /// Record id to look up
        #[arg(short, long)]
        id: String,

        /// Response language (en or fr, required)
        #[arg(short, long)]
        lang: String,

        /// Path to the NDJSON snapshot materialization
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// List records by modification date, newest first
    Modified {
        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Page size
        #[arg(short, long, default_value = "10000")]
        limit: usize,

        /// Only list records from this source system
        #[arg(long)]
        source_system: Option<String>,

        /// Path to the NDJSON snapshot materialization
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Show statistics about the loaded catalog
    Stats {
        /// Path to the NDJSON snapshot materialization
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Write a starter geolink.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let loaded_config = config::load_config(cli.config.as_deref())?.unwrap_or_default();
    let settings = loaded_config.settings();

    match cli.command {
        Commands::Serve { snapshot, port } => {
            let snapshot = snapshot_path(snapshot, &loaded_config)?;
            let port = loaded_config.port.unwrap_or(port);
            let service = build_service(&snapshot, settings);

            println!("🚀 Snapshot: {:?}", snapshot);
            tokio::runtime::Runtime::new()?
                .block_on(geolink::server::start_server(port, service))?;
        }

        Commands::Related { id, lang, snapshot } => {
            let snapshot = snapshot_path(snapshot, &loaded_config)?;
            let service = build_service(&snapshot, settings);

            println!("🔗 Resolving relationships for: {} (lang: {})...", id, lang);
            let response = service.related(Some(&id), Some(&lang));
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Detail { id, lang, snapshot } => {
            let snapshot = snapshot_path(snapshot, &loaded_config)?;
            let service = build_service(&snapshot, settings);

            println!("📄 Detail for: {} (lang: {})...", id, lang);
            let response = service.detail(Some(&id), Some(&lang));
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Modified { page, limit, source_system, snapshot } => {
            let snapshot = snapshot_path(snapshot, &loaded_config)?;
            let service = build_service(&snapshot, settings);

            println!("🕒 Records by modification date (page {}, limit {})...", page, limit);
            let listing = service.modified(page, limit, source_system.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }

        Commands::Stats { snapshot } => {
            let snapshot = snapshot_path(snapshot, &loaded_config)?;
            let service = build_service(&snapshot, settings);

            let stats = service.stats()?;
            println!("📊 Geolink Statistics ({:?})", snapshot);
            println!("------------------------------------");
            println!("{}", stats);
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let starter = config::GeolinkConfig {
                snapshot: Some("records.ndjson".to_string()),
                max_related: Some(ServiceSettings::default().max_related),
                cache_expiry_days: Some(ServiceSettings::default().cache_expiry_days),
                port: Some(3000),
            };
            config::write_config(&path, &starter, force)?;
            println!("✅ Wrote {}", path.display());
        }
    }

    Ok(())
}

fn snapshot_path(flag: Option<PathBuf>, config: &config::GeolinkConfig) -> anyhow::Result<PathBuf> {
    flag.or_else(|| config.snapshot.as_ref().map(PathBuf::from))
        .ok_or_else(|| anyhow::anyhow!("no snapshot path: pass --snapshot or set it in geolink.toml"))
}

fn build_service(snapshot: &Path, settings: ServiceSettings) -> CatalogService {
    CatalogService::new(Box::new(NdjsonCatalog::new(snapshot)), settings)
        .with_sink(Box::new(MemorySink::new()))
}
