//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage selection and the intake pipeline behind it
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs (JSON and XML bodies)
//! - `errors.rs`: error-to-status mapping

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use pedidos_infra::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(&config.storage).await?);
    Ok(router_with_services(services))
}

/// Router over already-built services.
pub fn router_with_services(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services)),
        )
}
