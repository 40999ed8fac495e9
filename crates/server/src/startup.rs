use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use service::product::{
    repo::seaorm::SeaOrmProductRepository,
    repository::{memory::InMemoryProductRepository, ProductRepository},
    ProductService,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{errors::StartupError, hypermedia::LinkDecorator, routes::{self, ServerState}};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Pick the repository for `[storage]`, connect and migrate when it is Postgres.
pub async fn build_repository(cfg: &AppConfig) -> anyhow::Result<Arc<dyn ProductRepository>> {
    match cfg.storage.backend {
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            migration::Migrator::up(&db, None).await?;
            info!("database migrations applied");
            Ok(Arc::new(SeaOrmProductRepository::new(db)))
        }
        StorageBackend::Memory => {
            warn!("using in-memory product storage; data is lost on restart");
            Ok(Arc::new(InMemoryProductRepository::default()))
        }
    }
}

pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let repo = build_repository(cfg).await?;
    let products = Arc::new(ProductService::new(repo));
    Ok(ServerState::new(products, LinkDecorator::from_config(&cfg.hypermedia)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Build the app from a loaded config and run the HTTP server until Ctrl+C
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, backend = ?cfg.storage.backend, hypermedia = cfg.hypermedia.enabled, "starting product server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
