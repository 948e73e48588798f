use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use wms_catalog::NewHub;
use wms_core::HubId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_hubs).post(create_hub))
        .route("/:id", get(get_hub))
}

pub async fn create_hub(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<NewHub>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let hub = match body.into_hub(HubId::new(), Utc::now()) {
        Ok(h) => h,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.catalog().insert_hub(&hub).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(hub_id = %hub.id, code = %hub.code, "hub created");
    (StatusCode::CREATED, Json(hub)).into_response()
}

pub async fn list_hubs(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.catalog().list_hubs().await {
        Ok(hubs) => (StatusCode::OK, Json(hubs)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_hub(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: HubId = match dto::parse_id(Some(&id), "hub id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog().get_hub(id).await {
        Ok(Some(hub)) => (StatusCode::OK, Json(hub)).into_response(),
        Ok(None) => errors::not_found("hub"),
        Err(e) => errors::store_error_to_response(e),
    }
}
