//! Seeds the three built-in roles. Safe to run repeatedly.

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use supplement_store_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    entity::roles::{ActiveModel as RoleActive, Column as RoleCol, Entity as Roles},
    middleware::auth::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_EMPLOYEE},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let orm = create_orm_conn(&config.database_url).await?;

    for role_name in [ROLE_ADMIN, ROLE_EMPLOYEE, ROLE_CUSTOMER] {
        let existing = Roles::find()
            .filter(RoleCol::RoleName.eq(role_name))
            .one(&orm)
            .await?;
        if existing.is_some() {
            tracing::info!(role = role_name, "role already present");
            continue;
        }
        RoleActive {
            id: Set(Uuid::new_v4()),
            role_name: Set(role_name.to_string()),
        }
        .insert(&orm)
        .await?;
        tracing::info!(role = role_name, "role created");
    }

    Ok(())
}
