use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, Product, ProductImage, Variant};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub category_id: Uuid,
    pub name: String,
    pub short_description: Option<String>,
    pub discount_percent: Option<Decimal>,
    pub active: Option<bool>,
}

/// Partial update. The slug is fixed at creation and is not touched here.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub discount_percent: Option<Decimal>,
    /// Clears the discount when true, whatever `discount_percent` says.
    #[serde(default)]
    pub clear_discount: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVariantRequest {
    pub sku: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price_cent: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub cost_cent: i64,
    pub active: Option<bool>,
}

/// Stock and cost are owned by checkout and purchase receiving.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateVariantRequest {
    pub sku: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price_cent: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateImageRequest {
    pub url: String,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub variants: Vec<Variant>,
    pub images: Vec<ProductImage>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct VariantList {
    #[schema(value_type = Vec<Variant>)]
    pub items: Vec<Variant>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ImageList {
    #[schema(value_type = Vec<ProductImage>)]
    pub items: Vec<ProductImage>,
}
