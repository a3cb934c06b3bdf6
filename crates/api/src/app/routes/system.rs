use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Read the whole store and report how many rows it has.
pub async fn store_check(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let backend = services.store.backend_name();
    match services.store.probe().await {
        Ok(rows) => {
            tracing::info!(backend, rows, "store check passed");
            Json(serde_json::json!({
                "ok": true,
                "backend": backend,
                "rows": rows,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::warn!(backend, error = %e, "store check failed");
            errors::json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", e.to_string())
        }
    }
}
