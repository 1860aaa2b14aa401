use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pedidos_infra::IntakeError;

use crate::app::dto::BodyError;

/// Message returned for every failure that is not a known duplicate.
pub const GENERIC_ERROR_MESSAGE: &str = "Ocorreu um erro no processamento da sua solicitação.";

pub fn intake_error_to_response(err: IntakeError) -> axum::response::Response {
    match err {
        IntakeError::DuplicateControlNumber(control_number) => {
            tracing::info!(%control_number, "duplicate control number");
            let message = IntakeError::DuplicateControlNumber(control_number).to_string();
            json_error(StatusCode::BAD_REQUEST, "duplicate_control_number", message)
        }
        IntakeError::Order(e) => {
            tracing::warn!(error = %e, "order rejected");
            internal_error()
        }
        IntakeError::Repository(e) => {
            tracing::error!(error = %e, "order storage failed");
            internal_error()
        }
    }
}

pub fn body_error_to_response(err: BodyError) -> axum::response::Response {
    tracing::warn!(error = %err, "unreadable order body");
    internal_error()
}

pub fn date_error_to_response(raw: &str, err: chrono::ParseError) -> axum::response::Response {
    tracing::warn!(value = raw, error = %err, "invalid dataCadastro filter");
    internal_error()
}

fn internal_error() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "processing_error",
        GENERIC_ERROR_MESSAGE,
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "status": status.as_u16(),
        })),
    )
        .into_response()
}
