use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    dto::wishlist::{AddWishlistItemRequest, WishlistWithItems},
    entity::{
        products::Entity as Products,
        wishlist_items::{
            ActiveModel as ItemActive, Column as ItemCol, Entity as WishlistItems,
            Model as ItemModel,
        },
        wishlists::{ActiveModel as WishlistActive, Column as WishlistCol, Entity as Wishlists},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::WishlistItem,
    pricing::clamp_quantity,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistWithItems>> {
    let txn = state.orm.begin().await?;
    let wishlist_id = get_or_create(&txn, user.user_id).await?;

    let items = WishlistItems::find()
        .filter(ItemCol::WishlistId.eq(wishlist_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect();

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Wishlist",
        WishlistWithItems { wishlist_id, items },
        Some(Meta::empty()),
    ))
}

/// Re-adding a product already on the list updates its desired quantity
/// instead of creating a second row.
pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    payload: AddWishlistItemRequest,
) -> AppResult<ApiResponse<WishlistItem>> {
    let quantity = clamp_quantity(payload.quantity.unwrap_or(1));
    let txn = state.orm.begin().await?;

    Products::find_by_id(payload.product_id)
        .one(&txn)
        .await?
        .ok_or(AppError::BadRequest("Unknown product".into()))?;

    let wishlist_id = get_or_create(&txn, user.user_id).await?;

    let existing = WishlistItems::find()
        .filter(ItemCol::WishlistId.eq(wishlist_id))
        .filter(ItemCol::ProductId.eq(payload.product_id))
        .one(&txn)
        .await?;

    let item = match existing {
        Some(row) => {
            let mut active: ItemActive = row.into();
            active.quantity = Set(quantity);
            active.update(&txn).await?
        }
        None => {
            ItemActive {
                id: Set(Uuid::new_v4()),
                wishlist_id: Set(wishlist_id),
                product_id: Set(payload.product_id),
                quantity: Set(quantity),
            }
            .insert(&txn)
            .await?
        }
    };

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Item added",
        item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;
    let wishlist_id = get_or_create(&txn, user.user_id).await?;

    let result = WishlistItems::delete_many()
        .filter(ItemCol::Id.eq(item_id))
        .filter(ItemCol::WishlistId.eq(wishlist_id))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Removed",
        serde_json::json!({ "id": item_id }),
        Some(Meta::empty()),
    ))
}

/// One wishlist per account, created on first touch.
async fn get_or_create<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<Uuid> {
    let existing = Wishlists::find()
        .filter(WishlistCol::UserAccountId.eq(user_id))
        .one(conn)
        .await?;
    if let Some(wishlist) = existing {
        return Ok(wishlist.id);
    }

    let wishlist = WishlistActive {
        id: Set(Uuid::new_v4()),
        user_account_id: Set(user_id),
    }
    .insert(conn)
    .await?;
    Ok(wishlist.id)
}

fn item_from_entity(model: ItemModel) -> WishlistItem {
    WishlistItem {
        id: model.id,
        wishlist_id: model.wishlist_id,
        product_id: model.product_id,
        quantity: model.quantity,
    }
}
