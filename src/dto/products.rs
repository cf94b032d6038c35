use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Product, ProductImage, ProductReview};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub product_name: String,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateImageRequest {
    pub image_url: String,
    pub is_default: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageList {
    pub items: Vec<ProductImage>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    /// Out-of-range ratings are clamped to [1, 5], not rejected.
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<ProductReview>,
}
