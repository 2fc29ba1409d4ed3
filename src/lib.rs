pub mod catalog;
pub mod config;
pub mod db;
pub mod metadata;
pub mod middleware;
pub mod server;
pub mod web;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "moviweb.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),
    #[error("Metadata client error: {0}")]
    Metadata(#[from] metadata::MetadataError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config_path: Option<&str>, debug_logs: bool) -> Result<(), ServerError> {
    let config = config::Config::load(config_path, DEFAULT_CONFIG_PATH)?;

    info!(
        "Using config file: {}",
        config_path.unwrap_or(DEFAULT_CONFIG_PATH)
    );
    if debug_logs {
        info!("Debug logging enabled");
    }

    let omdb = Arc::new(metadata::OmdbClient::new(&config.omdb)?);
    info!("OMDb endpoint: {}", config.omdb.url);

    let db_path = config.get_database_path().to_string();
    info!("Opening database at {}", db_path);
    let db = Arc::new(db::SqliteRepository::new(&db_path).await?);

    let catalog = Arc::new(catalog::Catalog::new(db, omdb));

    let address = config.listen.address.as_deref().unwrap_or("127.0.0.1");
    let port = config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(catalog);
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
