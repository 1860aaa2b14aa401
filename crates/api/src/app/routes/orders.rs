use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// `POST /api`: accept a JSON or XML batch of orders.
pub async fn create_orders(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let drafts = match dto::parse_order_batch(&headers, &body) {
        Ok(d) => d,
        Err(e) => return errors::body_error_to_response(e),
    };

    match services.submit(drafts).await {
        Ok(saved) => (StatusCode::CREATED, Json(dto::orders_to_response(&saved))).into_response(),
        Err(e) => errors::intake_error_to_response(e),
    }
}

/// `GET /api/consultar-pedidos`: control number wins over date; neither lists everything.
pub async fn search_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::OrderSearchParams>,
) -> axum::response::Response {
    let date = match params.date() {
        Ok(d) => d,
        Err(e) => {
            let raw = params.data_cadastro.as_deref().unwrap_or_default();
            return errors::date_error_to_response(raw, e);
        }
    };

    match services.search(params.numero_controle, date).await {
        Ok(orders) => (StatusCode::OK, Json(dto::orders_to_response(&orders))).into_response(),
        Err(e) => errors::intake_error_to_response(e),
    }
}
