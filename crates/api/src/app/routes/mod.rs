use axum::Router;

pub mod hubs;
pub mod inventory;
pub mod skus;
pub mod system;

/// Router for the versioned resource endpoints (mounted under `/api/v1`).
pub fn router() -> Router {
    Router::new()
        .nest("/hub", hubs::router())
        .nest("/sku", skus::router())
        .nest("/inventory", inventory::router())
}
