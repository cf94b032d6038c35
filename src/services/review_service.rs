use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::products::{CreateReviewRequest, ReviewList},
    entity::product_reviews::{
        ActiveModel as ReviewActive, Column as ReviewCol, Entity as ProductReviews,
        Model as ReviewModel,
    },
    entity::products::Entity as Products,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::ProductReview,
    pricing::clamp_rating,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Ratings outside [1, 5] are clamped, not rejected -- a 7 is stored as 5.
pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<ProductReview>> {
    Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let review = ReviewActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        user_account_id: Set(user.user_id),
        rating: Set(clamp_rating(payload.rating)),
        comment: Set(payload.comment),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Review created",
        review_from_entity(review),
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews(state: &AppState, product_id: Uuid) -> AppResult<ApiResponse<ReviewList>> {
    let items = ProductReviews::find()
        .filter(ReviewCol::ProductId.eq(product_id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();
    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(Meta::empty()),
    ))
}

/// A reviewer may delete their own review; admins may delete any.
pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let mut delete = ProductReviews::delete_many().filter(ReviewCol::Id.eq(review_id));
    if !user.has_role(crate::middleware::auth::ROLE_ADMIN) {
        delete = delete.filter(ReviewCol::UserAccountId.eq(user.user_id));
    }
    let result = delete.exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": review_id }),
        Some(Meta::empty()),
    ))
}

fn review_from_entity(model: ReviewModel) -> ProductReview {
    ProductReview {
        id: model.id,
        product_id: model.product_id,
        user_account_id: model.user_account_id,
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
