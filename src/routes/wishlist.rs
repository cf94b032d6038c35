use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::wishlist::{AddWishlistItemRequest, WishlistWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    models::WishlistItem,
    response::ApiResponse,
    services::wishlist_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_wishlist))
        .route("/items", post(add_item))
        .route("/items/{item_id}", delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    responses((status = 200, description = "Caller's wishlist", body = ApiResponse<WishlistWithItems>)),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn get_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<WishlistWithItems>>> {
    let resp = wishlist_service::get_wishlist(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wishlist/items",
    request_body = AddWishlistItemRequest,
    responses((status = 200, description = "Item added", body = ApiResponse<WishlistItem>)),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddWishlistItemRequest>,
) -> AppResult<Json<ApiResponse<WishlistItem>>> {
    let resp = wishlist_service::add_item(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/wishlist/items/{item_id}",
    responses((status = 200, description = "Item removed")),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = wishlist_service::remove_item(&state, &user, item_id).await?;
    Ok(Json(resp))
}
