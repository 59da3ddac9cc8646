//! `catalogd`: the catalog server binary.
//!
//! Usage:
//!   catalogd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/catalog/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use catalog_core::Module;
use tracing::info;

use config::ServerConfig;

/// Catalog server.
#[derive(Parser, Debug)]
#[command(name = "catalogd", about = "Catalog server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = catalog_core::ServiceConfig {
        data_dir: Some(data_dir),
        sqlite_path: server_config.storage.sqlite_path.as_ref().map(PathBuf::from),
        listen: cli.listen.clone(),
    };

    let sqlite_path = core_config.resolve_sqlite_path();
    let sql: Arc<dyn catalog_sql::SQLStore> = Arc::new(
        catalog_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    info!("SQL store opened at {}", sqlite_path.display());

    let catalog_module = catalog::CatalogModule::with_api_keys(Arc::clone(&sql))?;
    info!("Catalog module initialized");

    // Bootstrap: seed configured API keys.
    let added = bootstrap::seed_api_keys(sql.as_ref(), &server_config)?;
    info!("{} API key(s) seeded", added);

    let module_routes = vec![(catalog_module.name(), catalog_module.routes())];
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("Catalog server listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
