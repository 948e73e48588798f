use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use wms_catalog::NewSku;
use wms_core::SkuId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_skus).post(create_sku))
        .route("/:id", get(get_sku))
}

pub async fn create_sku(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<NewSku>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let sku = match body.into_sku(SkuId::new(), Utc::now()) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.catalog().insert_sku(&sku).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(sku_id = %sku.id, code = %sku.code, "sku created");
    (StatusCode::CREATED, Json(sku)).into_response()
}

pub async fn list_skus(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.catalog().list_skus().await {
        Ok(skus) => (StatusCode::OK, Json(skus)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SkuId = match dto::parse_id(Some(&id), "sku id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog().get_sku(id).await {
        Ok(Some(sku)) => (StatusCode::OK, Json(sku)).into_response(),
        Ok(None) => errors::not_found("sku"),
        Err(e) => errors::store_error_to_response(e),
    }
}
