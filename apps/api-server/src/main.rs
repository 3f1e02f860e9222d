//! Reelmate API Server binary.

use std::net::SocketAddr;

use api_server::{
    config::{Config, StorageBackend},
    create_app, create_state, init_tracing,
};
use film_store::{FilmStore, MemoryFilmStore, SqliteFilmStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(storage = %config.storage, "Starting Reelmate API Server");

    match config.storage {
        StorageBackend::Memory => serve(config, MemoryFilmStore::new()).await,
        StorageBackend::Sqlite => {
            let store = SqliteFilmStore::connect(&config.database_url).await?;
            tracing::info!(database_url = %config.database_url, "Connected to SQLite");
            serve(config, store).await
        }
    }
}

async fn serve<S: FilmStore + 'static>(config: Config, store: S) -> anyhow::Result<()> {
    let addr: SocketAddr = config.server_addr().parse()?;
    let app = create_app(create_state(config, store));

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
