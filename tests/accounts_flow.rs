use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set, Statement};
use uuid::Uuid;

use supplement_store_api::{
    db::{create_orm_conn, create_pool},
    dto::{
        accounts::{CreateAddressRequest, UpdateAccountRequest},
        auth::{LoginRequest, RegisterRequest},
    },
    entity::{UserAccounts, UserAddresses, roles::ActiveModel as RoleActive},
    error::AppError,
    middleware::auth::{AuthUser, ROLE_CUSTOMER},
    services::{account_service, auth_service},
    state::AppState,
};

// Integration flow: registration with its duplicate checks, login with the
// role-based redirect, partial profile update and default-address handling.
#[tokio::test]
async fn register_login_and_address_flow() -> anyhow::Result<()> {
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

    // An empty account table is reported as an error, not an empty list.
    let err = account_service::list_accounts(&state).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyTable(_)));

    // Registration needs the customer role seeded; without it nothing is
    // written at all.
    let err = account_service::register(&state, register_request("alice", "alice@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingDefaultRole(_)));
    assert_eq!(UserAccounts::find().count(&state.orm).await?, 0);

    RoleActive {
        id: Set(Uuid::new_v4()),
        role_name: Set(ROLE_CUSTOMER.to_string()),
    }
    .insert(&state.orm)
    .await?;

    let created = account_service::register(&state, register_request("alice", "alice@example.com"))
        .await?
        .data
        .expect("account data");
    assert_eq!(created.user_name, "alice");
    assert!(created.roles.iter().any(|r| r == ROLE_CUSTOMER));

    // Duplicate checks run in a fixed order: email, then username, then phone.
    let err = account_service::register(&state, register_request("bob", "alice@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail));

    let err = account_service::register(&state, register_request("alice", "bob@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateUsername));

    let mut same_phone = register_request("bob", "bob@example.com");
    same_phone.phone_number = Some("0900000001".into());
    let err = account_service::register(&state, same_phone).await.unwrap_err();
    assert!(matches!(err, AppError::DuplicatePhoneNumber));

    // None of the rejected attempts left a row behind.
    assert_eq!(UserAccounts::find().count(&state.orm).await?, 1);

    // Login verifies the hash and picks the landing page from the roles.
    unsafe { std::env::set_var("JWT_SECRET", "integration-test-secret") };
    let login = auth_service::login(
        &state.pool,
        LoginRequest {
            email: "alice@example.com".into(),
            password: "correct horse".into(),
        },
    )
    .await?
    .data
    .expect("login data");
    assert!(login.token.starts_with("Bearer "));
    assert_eq!(login.redirect_to, "/customer/home");

    let err = auth_service::login(
        &state.pool,
        LoginRequest {
            email: "alice@example.com".into(),
            password: "wrong".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Partial update touches only the supplied fields.
    let updated = account_service::update_account(
        &state,
        created.id,
        UpdateAccountRequest {
            user_name: None,
            password: None,
            email: None,
            phone_number: Some("0900000002".into()),
            is_active: None,
        },
    )
    .await?
    .data
    .expect("updated account");
    assert_eq!(updated.user_name, "alice");
    assert_eq!(updated.phone_number.as_deref(), Some("0900000002"));

    // An email-only patch leaves username, password hash, phone and the active
    // flag alone.
    let before = UserAccounts::find_by_id(created.id)
        .one(&state.orm)
        .await?
        .expect("account row");
    let updated = account_service::update_account(
        &state,
        created.id,
        UpdateAccountRequest {
            user_name: None,
            password: None,
            email: Some("alice.new@example.com".into()),
            phone_number: None,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("updated account");
    assert_eq!(updated.email, "alice.new@example.com");
    assert_eq!(updated.user_name, "alice");
    assert_eq!(updated.phone_number.as_deref(), Some("0900000002"));
    assert!(updated.is_active);
    let after = UserAccounts::find_by_id(created.id)
        .one(&state.orm)
        .await?
        .expect("account row");
    assert_eq!(after.hashed_password, before.hashed_password);

    // Changing the email to one held by another account is a conflict; keeping
    // the current one is not.
    let mut carol = register_request("carol", "carol@example.com");
    carol.phone_number = Some("0900000003".into());
    account_service::register(&state, carol).await?;

    let err = account_service::update_account(
        &state,
        created.id,
        UpdateAccountRequest {
            user_name: None,
            password: None,
            email: Some("carol@example.com".into()),
            phone_number: None,
            is_active: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail));

    let kept = account_service::update_account(
        &state,
        created.id,
        UpdateAccountRequest {
            user_name: None,
            password: None,
            email: Some("alice.new@example.com".into()),
            phone_number: None,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("updated account");
    assert_eq!(kept.email, "alice.new@example.com");

    // A new default address demotes the previous one.
    let user = AuthUser {
        user_id: created.id,
        roles: vec![ROLE_CUSTOMER.to_string()],
    };
    let first = account_service::create_address(&state, &user, address_request("Alice", true))
        .await?
        .data
        .expect("address");
    assert!(first.is_default);

    let second = account_service::create_address(&state, &user, address_request("Alice", true))
        .await?
        .data
        .expect("address");
    assert!(second.is_default);

    let defaults = UserAddresses::find().all(&state.orm).await?;
    let default_count = defaults.iter().filter(|a| a.is_default).count();
    assert_eq!(default_count, 1);
    assert!(!defaults.iter().any(|a| a.id == first.id && a.is_default));

    // Deleting the account takes its addresses with it.
    account_service::delete_account(&state, created.id).await?;
    assert_eq!(UserAddresses::find().count(&state.orm).await?, 0);

    Ok(())
}

fn register_request(user_name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        user_name: user_name.to_string(),
        email: email.to_string(),
        password: "correct horse".to_string(),
        phone_number: Some("0900000001".to_string()),
    }
}

fn address_request(receiver: &str, is_default: bool) -> CreateAddressRequest {
    CreateAddressRequest {
        house_address: Some("12".into()),
        street: Some("Main St".into()),
        ward: None,
        district: None,
        city: Some("Hanoi".into()),
        province: None,
        receiver_name: receiver.to_string(),
        receiver_phone: "0900000001".to_string(),
        is_default: Some(is_default),
    }
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
