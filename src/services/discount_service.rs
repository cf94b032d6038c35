use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateDiscountRequest, DiscountList, UpdateDiscountRequest},
    entity::discounts::{
        ActiveModel as DiscountActive, Column as DiscountCol, Entity as Discounts,
        Model as DiscountModel,
    },
    error::{AppError, AppResult},
    models::Discount,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_discounts(state: &AppState) -> AppResult<ApiResponse<DiscountList>> {
    let items = Discounts::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(discount_from_entity)
        .collect();
    Ok(ApiResponse::success(
        "Discounts",
        DiscountList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_discount(
    state: &AppState,
    payload: CreateDiscountRequest,
) -> AppResult<ApiResponse<Discount>> {
    if payload.end_at < payload.start_at {
        return Err(AppError::BadRequest(
            "Validity window ends before it starts".into(),
        ));
    }

    let taken = Discounts::find()
        .filter(DiscountCol::DiscountCode.eq(payload.discount_code.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if taken {
        return Err(AppError::Conflict("Discount code".into()));
    }

    let discount = DiscountActive {
        id: Set(Uuid::new_v4()),
        discount_code: Set(payload.discount_code),
        discount_type: Set(payload.discount_type),
        description: Set(payload.description),
        start_at: Set(payload.start_at.into()),
        end_at: Set(payload.end_at.into()),
        quantity: Set(payload.quantity),
        is_available: Set(payload.is_available.unwrap_or(true)),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Discount created",
        discount_from_entity(discount),
        Some(Meta::empty()),
    ))
}

pub async fn update_discount(
    state: &AppState,
    id: Uuid,
    payload: UpdateDiscountRequest,
) -> AppResult<ApiResponse<Discount>> {
    let existing = Discounts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let start_at = payload
        .start_at
        .unwrap_or_else(|| existing.start_at.with_timezone(&Utc));
    let end_at = payload
        .end_at
        .unwrap_or_else(|| existing.end_at.with_timezone(&Utc));
    if end_at < start_at {
        return Err(AppError::BadRequest(
            "Validity window ends before it starts".into(),
        ));
    }

    let mut active: DiscountActive = existing.into();
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    active.start_at = Set(start_at.into());
    active.end_at = Set(end_at.into());
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(Some(quantity));
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }

    let discount = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Discount updated",
        discount_from_entity(discount),
        Some(Meta::empty()),
    ))
}

pub async fn delete_discount(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Discounts::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

fn discount_from_entity(model: DiscountModel) -> Discount {
    Discount {
        id: model.id,
        discount_code: model.discount_code,
        discount_type: model.discount_type,
        description: model.description,
        start_at: model.start_at.with_timezone(&Utc),
        end_at: model.end_at.with_timezone(&Utc),
        quantity: model.quantity,
        is_available: model.is_available,
    }
}
