use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

use supplement_store_api::{
    db::{create_orm_conn, create_pool},
    dto::orders::{
        AttachDiscountRequest, CreateOrderRequest, OrderItemRequest, SetDiscountAmountRequest,
        UpdateItemQuantityRequest, UpdateOrderStatusRequest,
    },
    entity::{
        discounts::{ActiveModel as DiscountActive, DiscountType},
        orders::OrderStatus,
        products::ActiveModel as ProductActive,
        user_accounts::ActiveModel as AccountActive,
        user_addresses::ActiveModel as AddressActive,
    },
    error::AppError,
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_CUSTOMER},
    routes::params::{OrderListQuery, Pagination},
    services::order_service,
    state::AppState,
};

// Integration flow: order creation with price snapshots and quantity
// clamping, repricing on every mutation, discount attach/detach, ownership
// checks and back-office status updates.
#[tokio::test]
async fn order_pricing_and_discount_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let account_id = seed_account(&state, "carol", "carol@example.com").await?;
    let address_id = seed_address(&state, account_id).await?;
    let protein = seed_product(&state, "Whey Protein", dec!(19.99)).await?;
    let shaker = seed_product(&state, "Shaker Bottle", dec!(5.00)).await?;

    let user = AuthUser {
        user_id: account_id,
        roles: vec![ROLE_CUSTOMER.to_string()],
    };

    // An order without items is rejected outright.
    let err = order_service::create_order(
        &state,
        &user,
        CreateOrderRequest {
            user_address_id: address_id,
            shipping_unit_id: None,
            payment_method: None,
            items: vec![],
            discount_amount: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Unit prices are snapshotted and a zero quantity is clamped to one.
    let created = order_service::create_order(
        &state,
        &user,
        CreateOrderRequest {
            user_address_id: address_id,
            shipping_unit_id: None,
            payment_method: None,
            items: vec![
                OrderItemRequest {
                    product_id: protein,
                    quantity: 3,
                },
                OrderItemRequest {
                    product_id: shaker,
                    quantity: 0,
                },
            ],
            discount_amount: None,
        },
    )
    .await?
    .data
    .expect("order data");

    let order_id = created.order.id;
    assert_eq!(created.order.order_status, OrderStatus::Pending);
    assert_eq!(created.order.original_price, dec!(64.97));
    assert_eq!(created.order.discount_amount, Decimal::ZERO);
    assert_eq!(created.order.final_price, dec!(64.97));

    let shaker_line = created
        .items
        .iter()
        .find(|i| i.product_id == shaker)
        .expect("shaker line");
    assert_eq!(shaker_line.quantity, 1);
    assert_eq!(shaker_line.line_total, dec!(5.00));

    // A discount larger than the total floors the final price at zero.
    let resp = order_service::set_discount_amount(
        &state,
        &user,
        order_id,
        SetDiscountAmountRequest {
            discount_amount: dec!(100),
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(resp.order.final_price, Decimal::ZERO);

    let resp = order_service::set_discount_amount(
        &state,
        &user,
        order_id,
        SetDiscountAmountRequest {
            discount_amount: dec!(4.97),
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(resp.order.final_price, dec!(60.00));

    // Every item mutation reprices the order in the same transaction.
    let resp = order_service::add_item(
        &state,
        &user,
        order_id,
        OrderItemRequest {
            product_id: protein,
            quantity: 1,
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(resp.order.original_price, dec!(84.96));
    assert_eq!(resp.order.final_price, dec!(79.99));

    let shaker_item_id = resp
        .items
        .iter()
        .find(|i| i.product_id == shaker)
        .expect("shaker line")
        .id;

    let resp = order_service::update_item_quantity(
        &state,
        &user,
        order_id,
        shaker_item_id,
        UpdateItemQuantityRequest { quantity: 2 },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(resp.order.original_price, dec!(89.96));
    assert_eq!(resp.order.final_price, dec!(84.99));

    let resp = order_service::remove_item(&state, &user, order_id, shaker_item_id)
        .await?
        .data
        .expect("order data");
    assert_eq!(resp.order.original_price, dec!(79.96));
    assert_eq!(resp.order.final_price, dec!(74.99));

    // Attaching a code validates its window and availability; the amount
    // stays an explicit input.
    seed_discount(&state, "SUMMER10", Utc::now() - Duration::hours(1), Utc::now() + Duration::hours(1)).await?;
    seed_discount(
        &state,
        "EXPIRED",
        Utc::now() - Duration::days(10),
        Utc::now() - Duration::days(5),
    )
    .await?;

    let err = order_service::attach_discount(
        &state,
        &user,
        order_id,
        AttachDiscountRequest {
            discount_code: "EXPIRED".into(),
            discount_amount: Some(dec!(10)),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let resp = order_service::attach_discount(
        &state,
        &user,
        order_id,
        AttachDiscountRequest {
            discount_code: "SUMMER10".into(),
            discount_amount: Some(dec!(10)),
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(resp.order.discount_amount, dec!(10));
    assert_eq!(resp.order.final_price, dec!(69.96));

    // Detaching removes the link but keeps the stored amount.
    let summer_id = discount_id_by_code(&state, "SUMMER10").await?;
    let resp = order_service::detach_discount(&state, &user, order_id, summer_id)
        .await?
        .data
        .expect("order data");
    assert_eq!(resp.order.discount_amount, dec!(10));
    assert_eq!(resp.order.final_price, dec!(69.96));

    // Foreign accounts cannot see the order; an admin can.
    let stranger = AuthUser {
        user_id: Uuid::new_v4(),
        roles: vec![ROLE_CUSTOMER.to_string()],
    };
    let err = order_service::get_order(&state, &stranger, order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        roles: vec![ROLE_ADMIN.to_string()],
    };
    let seen = order_service::get_order(&state, &admin, order_id).await?;
    assert!(seen.data.is_some());

    // Back-office status update and listing.
    let resp = order_service::update_status(
        &state,
        order_id,
        UpdateOrderStatusRequest {
            order_status: OrderStatus::Confirmed,
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(resp.order_status, OrderStatus::Confirmed);

    let all = order_service::list_all_orders(
        &state,
        OrderListQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            status: None,
            sort_order: None,
        },
    )
    .await?
    .data
    .expect("orders");
    assert_eq!(all.items.len(), 1);

    order_service::delete_order(&state, &user, order_id).await?;
    let err = order_service::get_order(&state, &user, order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let orm = create_orm_conn(database_url).await?;

    // Clean tables between runs.
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE wishlist_item, wishlist, discount_order, order_item, orders, discount, \
         product_review, product_image, product_brand, product_category, product, brand, \
         category, shipping_unit, user_address, user_account_role, role, user_account CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn seed_account(state: &AppState, user_name: &str, email: &str) -> anyhow::Result<Uuid> {
    let account = AccountActive {
        id: Set(Uuid::new_v4()),
        user_name: Set(user_name.to_string()),
        email: Set(email.to_string()),
        hashed_password: Set("dummy".into()),
        phone_number: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(account.id)
}

async fn seed_address(state: &AppState, account_id: Uuid) -> anyhow::Result<Uuid> {
    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_account_id: Set(account_id),
        house_address: Set(Some("12".into())),
        street: Set(Some("Main St".into())),
        ward: Set(None),
        district: Set(None),
        city: Set(Some("Hanoi".into())),
        province: Set(None),
        receiver_name: Set("Carol".into()),
        receiver_phone: Set("0900000003".into()),
        is_default: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(address.id)
}

async fn seed_product(state: &AppState, name: &str, price: Decimal) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        product_name: Set(name.to_string()),
        description: Set(None),
        quantity: Set(100),
        price: Set(price),
        is_available: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

async fn seed_discount(
    state: &AppState,
    code: &str,
    start_at: chrono::DateTime<Utc>,
    end_at: chrono::DateTime<Utc>,
) -> anyhow::Result<Uuid> {
    let discount = DiscountActive {
        id: Set(Uuid::new_v4()),
        discount_code: Set(code.to_string()),
        discount_type: Set(DiscountType::FixedAmount),
        description: Set(None),
        start_at: Set(start_at.into()),
        end_at: Set(end_at.into()),
        quantity: Set(None),
        is_available: Set(true),
    }
    .insert(&state.orm)
    .await?;
    Ok(discount.id)
}

async fn discount_id_by_code(state: &AppState, code: &str) -> anyhow::Result<Uuid> {
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use supplement_store_api::entity::{Discounts, discounts::Column as DiscountCol};

    let discount = Discounts::find()
        .filter(DiscountCol::DiscountCode.eq(code))
        .one(&state.orm)
        .await?
        .expect("seeded discount");
    Ok(discount.id)
}
