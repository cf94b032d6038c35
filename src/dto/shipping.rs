use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ShippingUnit;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShippingUnitRequest {
    pub shipping_unit_name: String,
    pub hotline: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShippingUnitRequest {
    pub shipping_unit_name: Option<String>,
    pub hotline: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShippingUnitList {
    pub items: Vec<ShippingUnit>,
}
