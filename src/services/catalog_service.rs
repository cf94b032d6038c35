use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    dto::catalog::{BrandList, CategoryList, CreateBrandRequest, CreateCategoryRequest},
    entity::{
        brands::{ActiveModel as BrandActive, Column as BrandCol, Entity as Brands},
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        product_brands::{
            ActiveModel as ProductBrandActive, Column as ProductBrandCol, Entity as ProductBrands,
        },
        product_categories::{
            ActiveModel as ProductCategoryActive, Column as ProductCategoryCol,
            Entity as ProductCategories,
        },
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    models::{Brand, Category},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_brands(state: &AppState) -> AppResult<ApiResponse<BrandList>> {
    let items = Brands::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| Brand {
            id: m.id,
            brand_name: m.brand_name,
        })
        .collect();
    Ok(ApiResponse::success(
        "Brands",
        BrandList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_brand(
    state: &AppState,
    payload: CreateBrandRequest,
) -> AppResult<ApiResponse<Brand>> {
    let taken = Brands::find()
        .filter(BrandCol::BrandName.eq(payload.brand_name.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if taken {
        return Err(AppError::Conflict("Brand name".into()));
    }

    let brand = BrandActive {
        id: Set(Uuid::new_v4()),
        brand_name: Set(payload.brand_name),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Brand created",
        Brand {
            id: brand.id,
            brand_name: brand.brand_name,
        },
        Some(Meta::empty()),
    ))
}

/// Removing a brand never deletes products; only the join rows go.
pub async fn delete_brand(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    ProductBrands::delete_many()
        .filter(ProductBrandCol::BrandId.eq(id))
        .exec(&state.orm)
        .await?;
    let result = Brands::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

/// Single place that manages the product<->brand association. Both "sides"
/// are only ever derived by querying the join table.
pub async fn attach_brand(
    state: &AppState,
    product_id: Uuid,
    brand_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Brands::find_by_id(brand_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let exists = ProductBrands::find()
        .filter(ProductBrandCol::ProductId.eq(product_id))
        .filter(ProductBrandCol::BrandId.eq(brand_id))
        .one(&state.orm)
        .await?
        .is_some();
    if !exists {
        ProductBrandActive {
            product_id: Set(product_id),
            brand_id: Set(brand_id),
        }
        .insert(&state.orm)
        .await?;
    }

    Ok(ApiResponse::success(
        "Brand attached",
        serde_json::json!({ "product_id": product_id, "brand_id": brand_id }),
        Some(Meta::empty()),
    ))
}

pub async fn detach_brand(
    state: &AppState,
    product_id: Uuid,
    brand_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ProductBrands::delete_many()
        .filter(ProductBrandCol::ProductId.eq(product_id))
        .filter(ProductBrandCol::BrandId.eq(brand_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Brand detached",
        serde_json::json!({ "product_id": product_id, "brand_id": brand_id }),
        Some(Meta::empty()),
    ))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| Category {
            id: m.id,
            category_name: m.category_name,
        })
        .collect();
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let taken = Categories::find()
        .filter(CategoryCol::CategoryName.eq(payload.category_name.as_str()))
        .one(&state.orm)
        .await?
        .is_some();
    if taken {
        return Err(AppError::Conflict("Category name".into()));
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        category_name: Set(payload.category_name),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Category created",
        Category {
            id: category.id,
            category_name: category.category_name,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ProductCategories::delete_many()
        .filter(ProductCategoryCol::CategoryId.eq(id))
        .exec(&state.orm)
        .await?;
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

pub async fn attach_category(
    state: &AppState,
    product_id: Uuid,
    category_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Categories::find_by_id(category_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let exists = ProductCategories::find()
        .filter(ProductCategoryCol::ProductId.eq(product_id))
        .filter(ProductCategoryCol::CategoryId.eq(category_id))
        .one(&state.orm)
        .await?
        .is_some();
    if !exists {
        ProductCategoryActive {
            product_id: Set(product_id),
            category_id: Set(category_id),
        }
        .insert(&state.orm)
        .await?;
    }

    Ok(ApiResponse::success(
        "Category attached",
        serde_json::json!({ "product_id": product_id, "category_id": category_id }),
        Some(Meta::empty()),
    ))
}

pub async fn detach_category(
    state: &AppState,
    product_id: Uuid,
    category_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ProductCategories::delete_many()
        .filter(ProductCategoryCol::ProductId.eq(product_id))
        .filter(ProductCategoryCol::CategoryId.eq(category_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Category detached",
        serde_json::json!({ "product_id": product_id, "category_id": category_id }),
        Some(Meta::empty()),
    ))
}
