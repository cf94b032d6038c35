use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::catalog::{BrandList, CategoryList},
    dto::shipping::ShippingUnitList,
    error::AppResult,
    response::ApiResponse,
    services::{catalog_service, shipping_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/brands", get(list_brands))
        .route("/categories", get(list_categories))
        .route("/shipping-units", get(list_shipping_units))
}

#[utoipa::path(
    get,
    path = "/api/brands",
    responses((status = 200, description = "Brands", body = ApiResponse<BrandList>)),
    tag = "Catalog"
)]
pub async fn list_brands(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BrandList>>> {
    let resp = catalog_service::list_brands(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "Categories", body = ApiResponse<CategoryList>)),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/shipping-units",
    responses((status = 200, description = "Shipping units", body = ApiResponse<ShippingUnitList>)),
    tag = "Catalog"
)]
pub async fn list_shipping_units(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ShippingUnitList>>> {
    let resp = shipping_service::list_units(&state).await?;
    Ok(Json(resp))
}
