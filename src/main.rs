use std::sync::Arc;

use tracing::info;

use depot::repo::RepositoryService;
use depot::web::WebServer;
use depot::{Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = depot::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        depot::logging::init_console_only(&config.logging.level);
    }

    info!("Depot - self-hosted file repository");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let repository = match RepositoryService::new(&config.storage.root_path, db) {
        Ok(repository) => {
            info!("Repository root: {}", config.storage.root_path);
            repository
        }
        Err(e) => {
            tracing::error!("Failed to initialize repository: {e}");
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, repository) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to configure web server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Web server error: {e}");
        std::process::exit(1);
    }
}
