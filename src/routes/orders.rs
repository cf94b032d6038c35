use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        AttachDiscountRequest, CreateOrderRequest, OrderItemRequest, OrderList, OrderWithItems,
        SetDiscountAmountRequest, UpdateItemQuantityRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order).delete(delete_order))
        .route("/{id}/items", post(add_item))
        .route("/{id}/items/{item_id}", put(update_item_quantity).delete(remove_item))
        .route("/{id}/discount-amount", put(set_discount_amount))
        .route("/{id}/discounts", post(attach_discount))
        .route("/{id}/discounts/{discount_id}", delete(detach_discount))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Empty item list or foreign address")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::create_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Page size"),
        ("status" = Option<String>, Query, description = "Filter by order status")
    ),
    responses((status = 200, description = "Caller's orders", body = ApiResponse<OrderList>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Unknown or foreign order")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    responses((status = 200, description = "Order deleted")),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = order_service::delete_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/items",
    request_body = OrderItemRequest,
    responses((status = 200, description = "Item added, totals repriced", body = ApiResponse<OrderWithItems>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderItemRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::add_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/items/{item_id}",
    request_body = UpdateItemQuantityRequest,
    responses((status = 200, description = "Quantity updated, totals repriced", body = ApiResponse<OrderWithItems>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_item_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateItemQuantityRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::update_item_quantity(&state, &user, id, item_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/items/{item_id}",
    responses((status = 200, description = "Item removed, totals repriced", body = ApiResponse<OrderWithItems>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::remove_item(&state, &user, id, item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/discount-amount",
    request_body = SetDiscountAmountRequest,
    responses((status = 200, description = "Discount amount applied", body = ApiResponse<OrderWithItems>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn set_discount_amount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetDiscountAmountRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::set_discount_amount(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/discounts",
    request_body = AttachDiscountRequest,
    responses(
        (status = 200, description = "Discount attached", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Discount unavailable or outside its window")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn attach_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttachDiscountRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::attach_discount(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/discounts/{discount_id}",
    responses((status = 200, description = "Discount detached", body = ApiResponse<OrderWithItems>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn detach_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, discount_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::detach_discount(&state, &user, id, discount_id).await?;
    Ok(Json(resp))
}
