//! songbook-cb (Catalog Browser) - song catalog over HTTP
//!
//! Lists, searches, averages and rates songs stored in `<root>/songbook.db`,
//! seeding the catalog from the bundled dataset on first start.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use songbook_common::config::{
    database_path, resolve_page_size, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV,
};
use songbook_common::db::init_database;
use songbook_cb::seed::{seed_catalog, SeedOutcome};
use songbook_cb::store::SqliteSongStore;
use songbook_cb::{build_router, AppState, CatalogService};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DATASET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/songs.json");

/// Command-line arguments for songbook-cb
#[derive(Parser, Debug)]
#[command(name = "songbook-cb")]
#[command(about = "Song catalog browser for Songbook")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5780", env = "SONGBOOK_PORT")]
    port: u16,

    /// Root folder holding songbook.db
    #[arg(short, long, env = ROOT_FOLDER_ENV)]
    root_folder: Option<PathBuf>,

    /// TOML config file (defaults to ~/.config/songbook/config.toml)
    #[arg(short, long, env = "SONGBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-lines dataset used to seed an empty catalog
    #[arg(long, env = "SONGBOOK_DATASET")]
    dataset: Option<PathBuf>,

    /// Songs per page
    #[arg(long, env = "SONGBOOK_PAGE_SIZE")]
    page_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = match &args.config {
        Some(path) => TomlConfig::load(path),
        None => TomlConfig::load_default(),
    }
    .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let level = &toml_config.logging.level;
                format!("songbook_cb={level},songbook_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Songbook Catalog Browser (songbook-cb) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let root_folder =
        resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &toml_config);
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let page_size = resolve_page_size(args.page_size.or(toml_config.catalog.page_size))
        .context("Invalid page size")?;

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    let store = SqliteSongStore::new(pool);

    let dataset = args
        .dataset
        .or_else(|| toml_config.catalog.dataset.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));

    match seed_catalog(&store, &dataset)
        .await
        .context("Failed to seed catalog")?
    {
        SeedOutcome::Seeded(count) => info!("✓ Catalog seeded with {} songs", count),
        SeedOutcome::Skipped(count) => info!("✓ Catalog holds {} songs", count),
    }

    let catalog = CatalogService::new(Arc::new(store), page_size);
    let app = build_router(AppState::new(catalog));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("songbook-cb listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
