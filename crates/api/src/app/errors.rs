use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockdesk_infra::SessionError;

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    match err {
        SessionError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        SessionError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        SessionError::StoreUnavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
    }
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
        })),
    )
        .into_response()
}
