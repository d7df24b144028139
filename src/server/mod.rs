use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::service::CatalogService;

pub mod routes;

/// Server state shared across request handlers
pub struct AppState {
    pub service: CatalogService,
}

pub async fn start_server(port: u16, service: CatalogService) -> anyhow::Result<()> {
    let state = Arc::new(AppState { service });

    let app = Router::new()
        .route("/collections", get(routes::related))
        .route("/id", get(routes::detail))
        .route("/modified", get(routes::modified))
        .route("/stats", get(routes::stats))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Geolink serving at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
