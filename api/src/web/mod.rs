//! Web server module
//!
//! HTTP surface over the client facade: health, chat, and tool listing.

pub mod api;
pub mod state;

use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Start the web server
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = create_router(state);

    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/health",
            get(api::health_check).fallback(api::method_not_allowed),
        )
        .route("/chat", post(api::chat).fallback(api::method_not_allowed))
        .route(
            "/tools",
            get(api::list_tools).fallback(api::method_not_allowed),
        );

    Router::new()
        .route(
            "/",
            get(api::service_info).fallback(api::method_not_allowed),
        )
        .nest("/api", api_routes)
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
