use tracing::info;
use tracing_subscriber::EnvFilter;

use trip_server::config::{EngineConfig, ServerConfig};
use trip_server::session::{FileStorage, MemoryStorage};
use trip_server::web::{AppState, SessionStorage, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = ServerConfig::from_env().expect("Invalid server configuration");

    let storage = match &server.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "storing session snapshots on disk");
            SessionStorage::File(FileStorage::new(dir))
        }
        None => {
            info!("storing session snapshots in memory");
            SessionStorage::Memory(MemoryStorage::new())
        }
    };

    let state = AppState::new(EngineConfig::default(), storage);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(server.addr)
        .await
        .expect("Failed to bind listener");
    info!(addr = %server.addr, "trip server listening");

    axum::serve(listener, app).await.expect("Server error");
}
