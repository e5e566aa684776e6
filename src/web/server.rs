//! Web server for Depot.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::repo::RepositoryService;
use crate::Result;

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the repository API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server around a repository service.
    pub fn new(config: &Config, repository: RepositoryService) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                crate::DepotError::Config(format!("invalid web server address: {e}"))
            })?;

        let app_state = Arc::new(AppState::new(repository, config.max_upload_size()));

        Ok(Self {
            addr,
            app_state,
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// Run the server until shutdown.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.app_state, &self.cors_origins);

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on {}", self.addr);

        axum::serve(listener, router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_new_rejects_invalid_address() {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        let repository = RepositoryService::new(temp_dir.path().join("files"), db).unwrap();

        let mut config = Config::default();
        config.server.host = "not a host".to_string();

        let result = WebServer::new(&config, repository);
        assert!(result.is_err());
    }
}
