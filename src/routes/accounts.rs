use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::accounts::{AddressList, CreateAddressRequest, UpdateAccountRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Account, Address},
    response::ApiResponse,
    services::account_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/addresses", get(list_my_addresses).post(create_address))
}

#[utoipa::path(
    get,
    path = "/api/accounts/me",
    responses((status = 200, description = "Own account", body = ApiResponse<Account>)),
    tag = "Accounts"
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Account>>> {
    let resp = account_service::get_account(&state, user.user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/accounts/me",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<Account>),
        (status = 409, description = "Email already registered to another account")
    ),
    tag = "Accounts"
)]
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateAccountRequest>,
) -> AppResult<Json<ApiResponse<Account>>> {
    let resp = account_service::update_account(&state, user.user_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/accounts/me/addresses",
    responses((status = 200, description = "Addresses", body = ApiResponse<AddressList>)),
    tag = "Accounts"
)]
pub async fn list_my_addresses(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AddressList>>> {
    let resp = account_service::list_addresses(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/accounts/me/addresses",
    request_body = CreateAddressRequest,
    responses((status = 200, description = "Address created", body = ApiResponse<Address>)),
    tag = "Accounts"
)]
pub async fn create_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAddressRequest>,
) -> AppResult<Json<ApiResponse<Address>>> {
    let resp = account_service::create_address(&state, &user, payload).await?;
    Ok(Json(resp))
}
