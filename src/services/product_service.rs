use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::products::{
        CreateImageRequest, CreateProductRequest, ImageList, ProductList, UpdateProductRequest,
    },
    entity::product_images::{
        ActiveModel as ImageActive, Column as ImageCol, Entity as ProductImages,
        Model as ImageModel,
    },
    entity::products::{
        ActiveModel as ProductActive, Column as ProductCol, Entity as Products,
        Model as ProductModel,
    },
    error::{AppError, AppResult},
    models::{Product, ProductImage},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(ProductCol::ProductName).ilike(pattern.clone()))
                .add(Expr::col(ProductCol::Description).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(ProductCol::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(ProductCol::Price.lte(max_price));
    }

    if let Some(available) = query.available {
        condition = condition.add(ProductCol::IsAvailable.eq(available));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => ProductCol::CreatedAt,
        ProductSortBy::Price => ProductCol::Price,
        ProductSortBy::Name => ProductCol::ProductName,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Product",
        product_from_entity(product),
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let now = Utc::now();
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        product_name: Set(payload.product_name),
        description: Set(payload.description),
        quantity: Set(payload.quantity.unwrap_or(0).max(0)),
        price: Set(payload.price.unwrap_or(Decimal::ZERO)),
        is_available: Set(payload.is_available.unwrap_or(true)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    if let Some(product_name) = payload.product_name {
        active.product_name = Set(product_name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(quantity.max(0));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

/// Images and reviews go with the product via cascade.
pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

pub async fn list_images(state: &AppState, product_id: Uuid) -> AppResult<ApiResponse<ImageList>> {
    let items = ProductImages::find()
        .filter(ImageCol::ProductId.eq(product_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(image_from_entity)
        .collect();
    Ok(ApiResponse::success(
        "Images",
        ImageList { items },
        Some(Meta::empty()),
    ))
}

/// Adding a default image demotes the previous default in the same
/// transaction, so at most one default ever survives a commit.
pub async fn add_image(
    state: &AppState,
    product_id: Uuid,
    payload: CreateImageRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    let is_default = payload.is_default.unwrap_or(false);
    let txn = state.orm.begin().await?;

    Products::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if is_default {
        clear_default(&txn, product_id).await?;
    }

    let image = ImageActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        image_url: Set(payload.image_url),
        is_default: Set(is_default),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Image added",
        image_from_entity(image),
        Some(Meta::empty()),
    ))
}

pub async fn set_default_image(
    state: &AppState,
    product_id: Uuid,
    image_id: Uuid,
) -> AppResult<ApiResponse<ProductImage>> {
    let txn = state.orm.begin().await?;

    let image = ProductImages::find_by_id(image_id)
        .filter(ImageCol::ProductId.eq(product_id))
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    clear_default(&txn, product_id).await?;

    let mut active: ImageActive = image.into();
    active.is_default = Set(true);
    let image = active.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Default image set",
        image_from_entity(image),
        Some(Meta::empty()),
    ))
}

pub async fn delete_image(
    state: &AppState,
    product_id: Uuid,
    image_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ProductImages::delete_many()
        .filter(ImageCol::Id.eq(image_id))
        .filter(ImageCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": image_id }),
        Some(Meta::empty()),
    ))
}

async fn clear_default<C: sea_orm::ConnectionTrait>(conn: &C, product_id: Uuid) -> AppResult<()> {
    ProductImages::update_many()
        .col_expr(ImageCol::IsDefault, Expr::value(false))
        .filter(ImageCol::ProductId.eq(product_id))
        .filter(ImageCol::IsDefault.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        product_name: model.product_name,
        description: model.description,
        quantity: model.quantity,
        price: model.price,
        is_available: model.is_available,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn image_from_entity(model: ImageModel) -> ProductImage {
    ProductImage {
        id: model.id,
        product_id: model.product_id,
        image_url: model.image_url,
        is_default: model.is_default,
    }
}
