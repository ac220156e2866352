//! moviweb - movie tracking web service
//!
//! Users register, keep a list of favorite movies (metadata fetched from
//! OMDb), update or delete entries, and leave reviews. Storage is either a
//! SQLite database or flat JSON documents, selected at startup.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use moviweb_app::data::{DataManager, JsonDataManager, SqliteDataManager};
use moviweb_app::services::OmdbClient;
use moviweb_app::AppState;
use moviweb_common::config;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Backend {
    /// Relational SQLite database
    Sqlite,
    /// Flat JSON documents
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "moviweb", version, about = "Movie tracking web service")]
struct Args {
    /// Root folder holding the database / JSON documents
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
    backend: Backend,

    /// Listen port
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// OMDb API key for metadata lookups
    #[arg(long, env = "OMDB_API_KEY")]
    omdb_api_key: Option<String>,

    /// Maximum log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting moviweb");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let toml_config = config::TomlConfig::load_default();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    config::ensure_root_folder(&root_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;
    info!("Root folder: {}", root_folder.display());

    let data: Arc<dyn DataManager> = match args.backend {
        Backend::Sqlite => {
            let db_path = root_folder.join("movies.sqlite");
            let pool = moviweb_common::db::init::init_database(&db_path).await?;
            info!("Database connection established");
            Arc::new(SqliteDataManager::new(pool))
        }
        Backend::Json => {
            info!("Using JSON file backend");
            Arc::new(JsonDataManager::new(
                root_folder.join("movie_data.json"),
                root_folder.join("reviews.json"),
            ))
        }
    };

    let metadata = match config::resolve_omdb_api_key(args.omdb_api_key.as_deref(), &toml_config)
    {
        Some(key) => Some(Arc::new(OmdbClient::new(key)?)),
        None => {
            warn!("No OMDb API key configured; movie metadata lookups will fail");
            None
        }
    };

    let state = AppState::new(data, metadata);
    let app = moviweb_app::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
