use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Local;

use stockdesk_catalog::ProductForm;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_inventory).post(create_product))
        .route("/categories", get(list_categories))
}

pub async fn list_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::InventoryQuery>,
) -> axum::response::Response {
    let mut session = services.new_session();
    if let Err(e) = session.load().await {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "error": "store_unavailable",
                "message": e.to_string(),
                "items": [],
                "count": 0,
            })),
        )
            .into_response();
    }

    let view = session.view(query.search.as_deref());
    let items: Vec<dto::InventoryRow> = view
        .records
        .iter()
        .map(|r| dto::InventoryRow::from_record(r, &services.currency_symbol))
        .collect();

    Json(serde_json::json!({
        "count": items.len(),
        "items": items,
        "read_at": view.read_at,
    }))
    .into_response()
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let mut session = services.new_session();
    if let Err(e) = session.load().await {
        return errors::session_error_to_response(e);
    }

    Json(serde_json::json!({ "categories": session.category_choices() })).into_response()
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text());
        }
    };
    let form = ProductForm::from(body);

    let mut session = services.new_session();
    let today = Local::now().date_naive();
    match session.submit(&form, today).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(dto::InventoryRow::from_record(&record, &services.currency_symbol)),
        )
            .into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}
