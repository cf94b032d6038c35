use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::shipping::{CreateShippingUnitRequest, ShippingUnitList, UpdateShippingUnitRequest},
    entity::shipping_units::{
        ActiveModel as UnitActive, Entity as ShippingUnits, Model as UnitModel,
    },
    error::{AppError, AppResult},
    models::ShippingUnit,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_units(state: &AppState) -> AppResult<ApiResponse<ShippingUnitList>> {
    let items = ShippingUnits::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(unit_from_entity)
        .collect();
    Ok(ApiResponse::success(
        "Shipping units",
        ShippingUnitList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_unit(
    state: &AppState,
    payload: CreateShippingUnitRequest,
) -> AppResult<ApiResponse<ShippingUnit>> {
    let unit = UnitActive {
        id: Set(Uuid::new_v4()),
        shipping_unit_name: Set(payload.shipping_unit_name),
        hotline: Set(payload.hotline),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Shipping unit created",
        unit_from_entity(unit),
        Some(Meta::empty()),
    ))
}

pub async fn update_unit(
    state: &AppState,
    id: Uuid,
    payload: UpdateShippingUnitRequest,
) -> AppResult<ApiResponse<ShippingUnit>> {
    let existing = ShippingUnits::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: UnitActive = existing.into();
    if let Some(name) = payload.shipping_unit_name {
        active.shipping_unit_name = Set(name);
    }
    if let Some(hotline) = payload.hotline {
        active.hotline = Set(Some(hotline));
    }

    let unit = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Shipping unit updated",
        unit_from_entity(unit),
        Some(Meta::empty()),
    ))
}

pub async fn delete_unit(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ShippingUnits::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

fn unit_from_entity(model: UnitModel) -> ShippingUnit {
    ShippingUnit {
        id: model.id,
        shipping_unit_name: model.shipping_unit_name,
        hotline: model.hotline,
    }
}
