use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use wms_core::{HubId, SkuId};
use wms_inventory::{AdjustmentRequest, InventoryKey, NewInventoryRecord};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(adjust_inventory).get(get_inventory))
        .route("/records", post(create_record))
}

/// Decrement one or more counters of a single (sku, hub) record atomically.
pub async fn adjust_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<AdjustmentRequest>, JsonRejection>,
) -> axum::response::Response {
    let request = match dto::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.adjust(&request).await {
        Ok(()) => (
            StatusCode::OK,
            Json(dto::MessageResponse {
                message: "inventory updated",
            }),
        )
            .into_response(),
        Err(e) => errors::adjustment_error_to_response(e),
    }
}

pub async fn get_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::InventoryQuery>,
) -> axum::response::Response {
    let sku_id: SkuId = match dto::parse_id(query.sku_id.as_deref(), "sku_id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let hub_id: HubId = match dto::parse_id(query.hub_id.as_deref(), "hub_id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.get_inventory(InventoryKey::new(sku_id, hub_id)).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => errors::not_found("inventory"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_record(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<NewInventoryRecord>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let record = match body.into_record(Utc::now()) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.insert_inventory(&record).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(sku_id = %record.sku_id, hub_id = %record.hub_id, "inventory record created");
    (StatusCode::CREATED, Json(record)).into_response()
}
