use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::WishlistItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddWishlistItemRequest {
    pub product_id: Uuid,
    /// Clamped to >= 1; re-adding a product updates its quantity.
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistWithItems {
    pub wishlist_id: Uuid,
    pub items: Vec<WishlistItem>,
}
