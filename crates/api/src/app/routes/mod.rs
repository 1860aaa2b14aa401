use axum::{
    routing::{get, post},
    Router,
};

pub mod orders;
pub mod system;

/// Router for the order endpoints.
///
/// Submission is served both with and without the trailing slash.
pub fn router() -> Router {
    Router::new()
        .route("/api", post(orders::create_orders))
        .route("/api/", post(orders::create_orders))
        .route("/api/consultar-pedidos", get(orders::search_orders))
}
