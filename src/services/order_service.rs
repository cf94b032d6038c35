use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        AttachDiscountRequest, CreateOrderRequest, OrderItemRequest, OrderList, OrderWithItems,
        SetDiscountAmountRequest, UpdateItemQuantityRequest, UpdateOrderStatusRequest,
    },
    entity::{
        discount_orders::{
            ActiveModel as DiscountOrderActive, Column as DiscountOrderCol,
            Entity as DiscountOrders,
        },
        discounts::{Column as DiscountCol, Entity as Discounts},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
            OrderStatus, PaymentMethod,
        },
        products::Entity as Products,
        shipping_units::Entity as ShippingUnits,
        user_addresses::{Column as AddressCol, Entity as UserAddresses},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    pricing::{self, DiscountPolicy, ExplicitAmount},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Create an order from explicit line requests. Unit prices are snapshotted
/// from the products inside the transaction; the order's money fields are
/// derived before commit so no reader ever sees them inconsistent.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order has no items".into()));
    }

    let txn = state.orm.begin().await?;

    // The shipping address must exist and belong to the ordering account.
    let address = UserAddresses::find_by_id(payload.user_address_id)
        .filter(AddressCol::UserAccountId.eq(user.user_id))
        .one(&txn)
        .await?;
    if address.is_none() {
        return Err(AppError::BadRequest("Address does not belong to account".into()));
    }

    if let Some(unit_id) = payload.shipping_unit_id {
        if ShippingUnits::find_by_id(unit_id).one(&txn).await?.is_none() {
            return Err(AppError::BadRequest("Unknown shipping unit".into()));
        }
    }

    // The order row goes in first so the line FKs have a target; the money
    // fields are settled by reprice before commit.
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_account_id: Set(user.user_id),
        user_address_id: Set(payload.user_address_id),
        shipping_unit_id: Set(payload.shipping_unit_id),
        original_price: Set(Decimal::ZERO),
        discount_amount: Set(Decimal::ZERO),
        final_price: Set(Decimal::ZERO),
        order_status: Set(OrderStatus::Pending),
        payment_method: Set(payload.payment_method.unwrap_or(PaymentMethod::Cod)),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let mut original_price = Decimal::ZERO;
    for req in &payload.items {
        let item = insert_item(&txn, order.id, req).await?;
        original_price += item.line_total;
    }

    let policy = ExplicitAmount(payload.discount_amount.unwrap_or(Decimal::ZERO));
    let discount_amount = policy.amount(original_price, &[]);
    let (order, items) = reprice(&txn, order, Some(discount_amount)).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, "order created");

    Ok(ApiResponse::success(
        "Order created",
        with_items(order, items),
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = find_owned_order(&state.orm, user, id).await?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Order",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserAccountId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::OrderStatus.eq(status));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Back-office listing across all accounts.
pub async fn list_all_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::OrderStatus.eq(status));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Add a line to an existing order; original and final price follow in the
/// same transaction.
pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: OrderItemRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;
    let order = find_owned_order(&txn, user, order_id).await?;

    insert_item(&txn, order.id, &payload).await?;
    let (order, items) = reprice(&txn, order, None).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Item added",
        with_items(order, items),
        Some(Meta::empty()),
    ))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    item_id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;
    let order = find_owned_order(&txn, user, order_id).await?;

    let deleted = OrderItems::delete_many()
        .filter(OrderItemCol::Id.eq(item_id))
        .filter(OrderItemCol::OrderId.eq(order.id))
        .exec(&txn)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    let (order, items) = reprice(&txn, order, None).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Item removed",
        with_items(order, items),
        Some(Meta::empty()),
    ))
}

pub async fn update_item_quantity(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    item_id: Uuid,
    payload: UpdateItemQuantityRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;
    let order = find_owned_order(&txn, user, order_id).await?;

    let item = OrderItems::find_by_id(item_id)
        .filter(OrderItemCol::OrderId.eq(order.id))
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let quantity = pricing::clamp_quantity(payload.quantity);
    let unit_price = item.unit_price;
    let mut active: OrderItemActive = item.into();
    active.quantity = Set(quantity);
    active.line_total = Set(pricing::line_total(unit_price, quantity));
    active.update(&txn).await?;

    let (order, items) = reprice(&txn, order, None).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Quantity updated",
        with_items(order, items),
        Some(Meta::empty()),
    ))
}

/// The discount amount is an explicit external input; nothing derives it
/// from the attached discount rows.
pub async fn set_discount_amount(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: SetDiscountAmountRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;
    let order = find_owned_order(&txn, user, order_id).await?;

    let (order, items) = reprice(&txn, order, Some(payload.discount_amount)).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Discount amount set",
        with_items(order, items),
        Some(Meta::empty()),
    ))
}

pub async fn attach_discount(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: AttachDiscountRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;
    let order = find_owned_order(&txn, user, order_id).await?;

    let discount = Discounts::find()
        .filter(DiscountCol::DiscountCode.eq(payload.discount_code.as_str()))
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let now = Utc::now();
    if !discount.is_available
        || now < discount.start_at.with_timezone(&Utc)
        || now > discount.end_at.with_timezone(&Utc)
    {
        return Err(AppError::BadRequest("Discount is not currently valid".into()));
    }

    let already = DiscountOrders::find()
        .filter(DiscountOrderCol::OrderId.eq(order.id))
        .filter(DiscountOrderCol::DiscountId.eq(discount.id))
        .one(&txn)
        .await?;
    if already.is_none() {
        DiscountOrderActive {
            order_id: Set(order.id),
            discount_id: Set(discount.id),
        }
        .insert(&txn)
        .await?;
    }

    let (order, items) = reprice(&txn, order, payload.discount_amount).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Discount attached",
        with_items(order, items),
        Some(Meta::empty()),
    ))
}

/// Detaching never deletes the discount row itself, only the link. The final
/// price is recomputed with the order's stored discount amount, which stays
/// whatever the caller last supplied.
pub async fn detach_discount(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    discount_id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;
    let order = find_owned_order(&txn, user, order_id).await?;

    let deleted = DiscountOrders::delete_many()
        .filter(DiscountOrderCol::OrderId.eq(order.id))
        .filter(DiscountOrderCol::DiscountId.eq(discount_id))
        .exec(&txn)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    let (order, items) = reprice(&txn, order, None).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Discount detached",
        with_items(order, items),
        Some(Meta::empty()),
    ))
}

/// Status moves freely between the six states; the store has never imposed
/// transition rules.
pub async fn update_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = order.into();
    active.order_status = Set(payload.order_status);
    let order = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Status updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

/// Items go with the order (cascade), inside one transaction.
pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;
    let order = find_owned_order(&txn, user, id).await?;

    OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .exec(&txn)
        .await?;
    DiscountOrders::delete_many()
        .filter(DiscountOrderCol::OrderId.eq(order.id))
        .exec(&txn)
        .await?;
    Orders::delete_by_id(order.id).exec(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

/// Snapshot the product's current price into the new line. Later product
/// price changes never touch existing lines.
async fn insert_item<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    req: &OrderItemRequest,
) -> AppResult<OrderItemModel> {
    let product = Products::find_by_id(req.product_id)
        .one(conn)
        .await?
        .ok_or(AppError::BadRequest(format!(
            "Unknown product {}",
            req.product_id
        )))?;

    let quantity = pricing::clamp_quantity(req.quantity);
    let item = OrderItemActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        product_id: Set(product.id),
        quantity: Set(quantity),
        unit_price: Set(product.price),
        line_total: Set(pricing::line_total(product.price, quantity)),
    }
    .insert(conn)
    .await?;

    Ok(item)
}

/// Re-derive original_price from the stored lines and final_price from the
/// invariant, optionally replacing the discount amount first.
async fn reprice<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
    discount_amount: Option<Decimal>,
) -> AppResult<(OrderModel, Vec<OrderItemModel>)> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(conn)
        .await?;

    let original_price: Decimal = items.iter().map(|i| i.line_total).sum();
    let discount_amount = match discount_amount {
        Some(amount) => ExplicitAmount(amount).amount(original_price, &[]),
        None => order.discount_amount,
    };

    let mut active: OrderActive = order.into();
    active.original_price = Set(original_price);
    active.discount_amount = Set(discount_amount);
    active.final_price = Set(pricing::final_price(original_price, discount_amount));
    let order = active.update(conn).await?;

    Ok((order, items))
}

async fn find_owned_order<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<OrderModel> {
    let mut finder = Orders::find_by_id(id);
    if !user.has_role(crate::middleware::auth::ROLE_ADMIN) {
        finder = finder.filter(OrderCol::UserAccountId.eq(user.user_id));
    }
    finder.one(conn).await?.ok_or(AppError::NotFound)
}

fn with_items(order: OrderModel, items: Vec<OrderItemModel>) -> OrderWithItems {
    OrderWithItems {
        order: order_from_entity(order),
        items: items.into_iter().map(order_item_from_entity).collect(),
    }
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_account_id: model.user_account_id,
        user_address_id: model.user_address_id,
        shipping_unit_id: model.shipping_unit_id,
        original_price: model.original_price,
        discount_amount: model.discount_amount,
        final_price: model.final_price,
        order_status: model.order_status,
        payment_method: model.payment_method,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
        line_total: model.line_total,
    }
}
