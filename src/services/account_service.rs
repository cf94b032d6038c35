use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::accounts::{AccountList, AddressList, CreateAddressRequest, UpdateAccountRequest},
    dto::auth::RegisterRequest,
    entity::{
        roles::{Column as RoleCol, Entity as Roles},
        user_account_roles::ActiveModel as AccountRoleActive,
        user_accounts::{
            ActiveModel as AccountActive, Column as AccountCol, Entity as UserAccounts,
            Model as AccountModel,
        },
        user_addresses::{
            ActiveModel as AddressActive, Column as AddressCol, Entity as UserAddresses,
            Model as AddressModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ROLE_CUSTOMER},
    models::{Account, Address},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hashed)
}

/// Register a new account: uniqueness checks run in order (email, username,
/// phone) and the first violation aborts before anything is written. The
/// default customer role must pre-exist; its absence is a seed-data defect.
pub async fn register(state: &AppState, payload: RegisterRequest) -> AppResult<ApiResponse<Account>> {
    let txn = state.orm.begin().await?;

    if UserAccounts::find()
        .filter(AccountCol::Email.eq(payload.email.as_str()))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateEmail);
    }

    if UserAccounts::find()
        .filter(AccountCol::UserName.eq(payload.user_name.as_str()))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateUsername);
    }

    if let Some(phone) = payload.phone_number.as_deref() {
        if UserAccounts::find()
            .filter(AccountCol::PhoneNumber.eq(phone))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicatePhoneNumber);
        }
    }

    let customer_role = Roles::find()
        .filter(RoleCol::RoleName.eq(ROLE_CUSTOMER))
        .one(&txn)
        .await?
        .ok_or(AppError::MissingDefaultRole(ROLE_CUSTOMER))?;

    let hashed_password = hash_password(&payload.password)?;
    let now = Utc::now();

    let account = AccountActive {
        id: Set(Uuid::new_v4()),
        user_name: Set(payload.user_name),
        email: Set(payload.email),
        hashed_password: Set(hashed_password),
        phone_number: Set(payload.phone_number),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    AccountRoleActive {
        user_account_id: Set(account.id),
        role_id: Set(customer_role.id),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(account_id = %account.id, "account registered");

    let roles = vec![customer_role.role_name];
    Ok(ApiResponse::success(
        "Account registered",
        account_from_entity(account, roles),
        Some(Meta::empty()),
    ))
}

pub async fn get_account(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Account>> {
    let account = UserAccounts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let roles = load_role_names(&state.orm, &account).await?;
    Ok(ApiResponse::success(
        "Account",
        account_from_entity(account, roles),
        None,
    ))
}

pub async fn get_by_username(state: &AppState, user_name: &str) -> AppResult<ApiResponse<Account>> {
    let account = UserAccounts::find()
        .filter(AccountCol::UserName.eq(user_name))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let roles = load_role_names(&state.orm, &account).await?;
    Ok(ApiResponse::success(
        "Account",
        account_from_entity(account, roles),
        None,
    ))
}

pub async fn get_by_phone(state: &AppState, phone_number: &str) -> AppResult<ApiResponse<Account>> {
    let account = UserAccounts::find()
        .filter(AccountCol::PhoneNumber.eq(phone_number))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let roles = load_role_names(&state.orm, &account).await?;
    Ok(ApiResponse::success(
        "Account",
        account_from_entity(account, roles),
        None,
    ))
}

/// List every account. An empty table is reported as an error, not an empty
/// list -- longstanding store behavior that callers rely on.
pub async fn list_accounts(state: &AppState) -> AppResult<ApiResponse<AccountList>> {
    let rows = UserAccounts::find()
        .find_with_related(Roles)
        .all(&state.orm)
        .await?;

    if rows.is_empty() {
        tracing::warn!("account listing requested while the table is empty");
        return Err(AppError::EmptyTable("user_account"));
    }

    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .map(|(account, roles)| {
            let names = roles.into_iter().map(|r| r.role_name).collect();
            account_from_entity(account, names)
        })
        .collect();

    Ok(ApiResponse::success(
        "Accounts",
        AccountList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// Field-by-field partial update. A patch email colliding with another
/// account is a conflict; colliding with the account's own stored email is
/// not. Role changes are out of scope here.
pub async fn update_account(
    state: &AppState,
    id: Uuid,
    patch: UpdateAccountRequest,
) -> AppResult<ApiResponse<Account>> {
    let txn = state.orm.begin().await?;

    let existing = UserAccounts::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: AccountActive = existing.into();

    if let Some(user_name) = patch.user_name {
        active.user_name = Set(user_name);
    }
    if let Some(password) = patch.password {
        active.hashed_password = Set(hash_password(&password)?);
    }
    if let Some(email) = patch.email {
        let taken = UserAccounts::find()
            .filter(AccountCol::Email.eq(email.as_str()))
            .filter(AccountCol::Id.ne(id))
            .one(&txn)
            .await?
            .is_some();
        if taken {
            return Err(AppError::DuplicateEmail);
        }
        active.email = Set(email);
    }
    if let Some(phone_number) = patch.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    if let Some(is_active) = patch.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let account = active.update(&txn).await?;
    txn.commit().await?;

    let roles = load_role_names(&state.orm, &account).await?;
    Ok(ApiResponse::success(
        "Account updated",
        account_from_entity(account, roles),
        Some(Meta::empty()),
    ))
}

/// Delete an account. Addresses, reviews, orders (with their items) and the
/// wishlist go with it via foreign-key cascade.
pub async fn delete_account(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = UserAccounts::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(account_id = %id, "account deleted");
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let is_default = payload.is_default.unwrap_or(false);
    let txn = state.orm.begin().await?;

    // Only one default address per account.
    if is_default {
        let defaults = UserAddresses::find()
            .filter(AddressCol::UserAccountId.eq(user.user_id))
            .filter(AddressCol::IsDefault.eq(true))
            .all(&txn)
            .await?;
        for row in defaults {
            let mut active: AddressActive = row.into();
            active.is_default = Set(false);
            active.update(&txn).await?;
        }
    }

    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_account_id: Set(user.user_id),
        house_address: Set(payload.house_address),
        street: Set(payload.street),
        ward: Set(payload.ward),
        district: Set(payload.district),
        city: Set(payload.city),
        province: Set(payload.province),
        receiver_name: Set(payload.receiver_name),
        receiver_phone: Set(payload.receiver_phone),
        is_default: Set(is_default),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Address created",
        address_from_entity(address),
        Some(Meta::empty()),
    ))
}

pub async fn list_addresses(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AddressList>> {
    let items = UserAddresses::find()
        .filter(AddressCol::UserAccountId.eq(user.user_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(address_from_entity)
        .collect();
    Ok(ApiResponse::success(
        "Addresses",
        AddressList { items },
        Some(Meta::empty()),
    ))
}

async fn load_role_names<C: ConnectionTrait>(
    conn: &C,
    account: &AccountModel,
) -> AppResult<Vec<String>> {
    let roles = account.find_related(Roles).all(conn).await?;
    Ok(roles.into_iter().map(|r| r.role_name).collect())
}

fn account_from_entity(model: AccountModel, roles: Vec<String>) -> Account {
    Account {
        id: model.id,
        user_name: model.user_name,
        email: model.email,
        phone_number: model.phone_number,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        roles,
    }
}

fn address_from_entity(model: AddressModel) -> Address {
    Address {
        id: model.id,
        user_account_id: model.user_account_id,
        house_address: model.house_address,
        street: model.street,
        ward: model.ward,
        district: model.district,
        city: model.city,
        province: model.province,
        receiver_name: model.receiver_name,
        receiver_phone: model.receiver_phone,
        is_default: model.is_default,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
