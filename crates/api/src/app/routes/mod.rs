use axum::{routing::get, Router};

pub mod inventory;
pub mod system;

/// Router for all inventory and diagnostics endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/inventory", inventory::router())
        .route("/system/store-check", get(system::store_check))
}
