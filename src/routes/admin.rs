//! Back-office surface. Every handler checks roles up front; product and
//! catalog writes accept employees, account administration is admin only.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        accounts::{AccountList, UpdateAccountRequest},
        catalog::{
            CreateBrandRequest, CreateCategoryRequest, CreateDiscountRequest, DiscountList,
            UpdateDiscountRequest,
        },
        orders::{OrderList, UpdateOrderStatusRequest},
        products::{CreateImageRequest, CreateProductRequest, UpdateProductRequest},
        shipping::{CreateShippingUnitRequest, ShippingUnitList, UpdateShippingUnitRequest},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{Account, Brand, Category, Discount, Order, Product, ProductImage, ShippingUnit},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{
        account_service, catalog_service, discount_service, order_service, product_service,
        shipping_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/{id}", get(get_account).put(update_account).delete(delete_account))
        .route("/accounts/by-username/{user_name}", get(get_account_by_username))
        .route("/accounts/by-phone/{phone_number}", get(get_account_by_phone))
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/images", post(add_image))
        .route("/products/{id}/images/{image_id}", delete(delete_image))
        .route("/products/{id}/images/{image_id}/default", put(set_default_image))
        .route("/products/{id}/brands/{brand_id}", post(attach_brand).delete(detach_brand))
        .route(
            "/products/{id}/categories/{category_id}",
            post(attach_category).delete(detach_category),
        )
        .route("/brands", post(create_brand))
        .route("/brands/{id}", delete(delete_brand))
        .route("/categories", post(create_category))
        .route("/categories/{id}", delete(delete_category))
        .route("/discounts", get(list_discounts).post(create_discount))
        .route("/discounts/{id}", put(update_discount).delete(delete_discount))
        .route("/shipping-units", get(list_shipping_units).post(create_shipping_unit))
        .route("/shipping-units/{id}", put(update_shipping_unit).delete(delete_shipping_unit))
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}/status", put(update_order_status))
}

// ---- accounts -------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/accounts",
    responses(
        (status = 200, description = "All accounts with roles", body = ApiResponse<AccountList>),
        (status = 404, description = "No accounts exist yet")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AccountList>>> {
    ensure_admin(&user)?;
    let resp = account_service::list_accounts(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/accounts/{id}",
    responses((status = 200, description = "Account", body = ApiResponse<Account>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Account>>> {
    ensure_admin(&user)?;
    let resp = account_service::get_account(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/accounts/by-username/{user_name}",
    responses((status = 200, description = "Account", body = ApiResponse<Account>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_account_by_username(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_name): Path<String>,
) -> AppResult<Json<ApiResponse<Account>>> {
    ensure_admin(&user)?;
    let resp = account_service::get_by_username(&state, &user_name).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/accounts/by-phone/{phone_number}",
    responses((status = 200, description = "Account", body = ApiResponse<Account>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_account_by_phone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(phone_number): Path<String>,
) -> AppResult<Json<ApiResponse<Account>>> {
    ensure_admin(&user)?;
    let resp = account_service::get_by_phone(&state, &phone_number).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/accounts/{id}",
    request_body = UpdateAccountRequest,
    responses((status = 200, description = "Account updated", body = ApiResponse<Account>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    ensure_admin(&user)?;
    let resp = account_service::update_account(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/accounts/{id}",
    responses((status = 200, description = "Account and owned rows deleted")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_admin(&user)?;
    let resp = account_service::delete_account(&state, id).await?;
    Ok(Json(resp))
}

// ---- products -------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses((status = 200, description = "Product created", body = ApiResponse<Product>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    ensure_staff(&user)?;
    let resp = product_service::create_product(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    request_body = UpdateProductRequest,
    responses((status = 200, description = "Product updated", body = ApiResponse<Product>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    ensure_staff(&user)?;
    let resp = product_service::update_product(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    responses((status = 200, description = "Product deleted")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = product_service::delete_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/images",
    request_body = CreateImageRequest,
    responses((status = 200, description = "Image added", body = ApiResponse<ProductImage>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateImageRequest>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    ensure_staff(&user)?;
    let resp = product_service::add_image(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}/images/{image_id}/default",
    responses((status = 200, description = "Image promoted to default", body = ApiResponse<ProductImage>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_default_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    ensure_staff(&user)?;
    let resp = product_service::set_default_image(&state, id, image_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}/images/{image_id}",
    responses((status = 200, description = "Image deleted")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = product_service::delete_image(&state, id, image_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/brands/{brand_id}",
    responses((status = 200, description = "Brand linked to product")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn attach_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, brand_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = catalog_service::attach_brand(&state, id, brand_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}/brands/{brand_id}",
    responses((status = 200, description = "Brand unlinked from product")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn detach_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, brand_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = catalog_service::detach_brand(&state, id, brand_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/categories/{category_id}",
    responses((status = 200, description = "Category linked to product")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn attach_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, category_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = catalog_service::attach_category(&state, id, category_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}/categories/{category_id}",
    responses((status = 200, description = "Category unlinked from product")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn detach_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, category_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = catalog_service::detach_category(&state, id, category_id).await?;
    Ok(Json(resp))
}

// ---- brands and categories ------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/admin/brands",
    request_body = CreateBrandRequest,
    responses(
        (status = 200, description = "Brand created", body = ApiResponse<Brand>),
        (status = 409, description = "Name already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBrandRequest>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    ensure_staff(&user)?;
    let resp = catalog_service::create_brand(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/brands/{id}",
    responses((status = 200, description = "Brand and its product links deleted")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = catalog_service::delete_brand(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 409, description = "Name already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    ensure_staff(&user)?;
    let resp = catalog_service::create_category(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    responses((status = 200, description = "Category and its product links deleted")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = catalog_service::delete_category(&state, id).await?;
    Ok(Json(resp))
}

// ---- discounts ------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/discounts",
    responses((status = 200, description = "Discounts", body = ApiResponse<DiscountList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_discounts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DiscountList>>> {
    ensure_staff(&user)?;
    let resp = discount_service::list_discounts(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/discounts",
    request_body = CreateDiscountRequest,
    responses(
        (status = 200, description = "Discount created", body = ApiResponse<Discount>),
        (status = 400, description = "Window ends before it starts"),
        (status = 409, description = "Code already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateDiscountRequest>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    ensure_staff(&user)?;
    let resp = discount_service::create_discount(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/discounts/{id}",
    request_body = UpdateDiscountRequest,
    responses((status = 200, description = "Discount updated", body = ApiResponse<Discount>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDiscountRequest>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    ensure_staff(&user)?;
    let resp = discount_service::update_discount(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/discounts/{id}",
    responses((status = 200, description = "Discount deleted")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = discount_service::delete_discount(&state, id).await?;
    Ok(Json(resp))
}

// ---- shipping units -------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/shipping-units",
    responses((status = 200, description = "Shipping units", body = ApiResponse<ShippingUnitList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_shipping_units(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ShippingUnitList>>> {
    ensure_staff(&user)?;
    let resp = shipping_service::list_units(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/shipping-units",
    request_body = CreateShippingUnitRequest,
    responses((status = 200, description = "Shipping unit created", body = ApiResponse<ShippingUnit>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_shipping_unit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateShippingUnitRequest>,
) -> AppResult<Json<ApiResponse<ShippingUnit>>> {
    ensure_staff(&user)?;
    let resp = shipping_service::create_unit(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/shipping-units/{id}",
    request_body = UpdateShippingUnitRequest,
    responses((status = 200, description = "Shipping unit updated", body = ApiResponse<ShippingUnit>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_shipping_unit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShippingUnitRequest>,
) -> AppResult<Json<ApiResponse<ShippingUnit>>> {
    ensure_staff(&user)?;
    let resp = shipping_service::update_unit(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/shipping-units/{id}",
    responses((status = 200, description = "Shipping unit deleted")),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_shipping_unit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_staff(&user)?;
    let resp = shipping_service::delete_unit(&state, id).await?;
    Ok(Json(resp))
}

// ---- orders ---------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Page size"),
        ("status" = Option<String>, Query, description = "Filter by order status")
    ),
    responses((status = 200, description = "Orders across all accounts", body = ApiResponse<OrderList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    ensure_staff(&user)?;
    let resp = order_service::list_all_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    request_body = UpdateOrderStatusRequest,
    responses((status = 200, description = "Status updated", body = ApiResponse<Order>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    ensure_staff(&user)?;
    let resp = order_service::update_status(&state, id, payload).await?;
    Ok(Json(resp))
}
