use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{entity, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err(AppError::BadRequest("Invalid order status".into())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::categories::Model> for Category {
    fn from(model: entity::categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub discount_percent: Option<Decimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<entity::products::Model> for Product {
    fn from(model: entity::products::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            slug: model.slug,
            short_description: model.short_description,
            discount_percent: model.discount_percent,
            active: model.active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price_cent: i64,
    pub cost_cent: i64,
    pub stock: i32,
    pub active: bool,
}

impl From<entity::product_variants::Model> for Variant {
    fn from(model: entity::product_variants::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            sku: model.sku,
            color: model.color,
            size: model.size,
            price_cent: model.price_cent,
            cost_cent: model.cost_cent,
            stock: model.stock,
            active: model.active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub sort_order: i32,
}

impl From<entity::product_images::Model> for ProductImage {
    fn from(model: entity::product_images::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            url: model.url,
            sort_order: model.sort_order,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub label: Option<String>,
    pub recipient: String,
    pub department: String,
    pub city: String,
    pub street: String,
    pub country: String,
    pub is_default: bool,
}

impl From<entity::addresses::Model> for Address {
    fn from(model: entity::addresses::Model) -> Self {
        Self {
            id: model.id,
            label: model.label,
            recipient: model.recipient,
            department: model.department,
            city: model.city,
            street: model.street,
            country: model.country,
            is_default: model.is_default,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub status: String,
    pub subtotal_cent: i64,
    pub discount_cent: i64,
    pub tax_cent: i64,
    pub shipping_cent: i64,
    pub total_cent: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            address_id: model.address_id,
            status: model.status,
            subtotal_cent: model.subtotal_cent,
            discount_cent: model.discount_cent,
            tax_cent: model.tax_cent,
            shipping_cent: model.shipping_cent,
            total_cent: model.total_cent,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub name_snapshot: String,
    pub color_snapshot: Option<String>,
    pub size_snapshot: Option<String>,
    pub cost_snapshot_cent: i64,
    pub qty: i32,
    pub unit_price_cent: i64,
    pub line_total_cent: i64,
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(model: entity::order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            variant_id: model.variant_id,
            name_snapshot: model.name_snapshot,
            color_snapshot: model.color_snapshot,
            size_snapshot: model.size_snapshot,
            cost_snapshot_cent: model.cost_snapshot_cent,
            qty: model.qty,
            unit_price_cent: model.unit_price_cent,
            line_total_cent: model.line_total_cent,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub tax_id: Option<String>,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::suppliers::Model> for Supplier {
    fn from(model: entity::suppliers::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            tax_id: model.tax_id,
            contact: model.contact,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Purchase {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub invoice_number: Option<String>,
    pub notes: Option<String>,
    pub subtotal_cent: i64,
    pub iva_cent: i64,
    pub retefuente_cent: i64,
    pub total_cent: i64,
    pub created_at: DateTime<Utc>,
}

impl From<entity::purchases::Model> for Purchase {
    fn from(model: entity::purchases::Model) -> Self {
        Self {
            id: model.id,
            supplier_id: model.supplier_id,
            invoice_number: model.invoice_number,
            notes: model.notes,
            subtotal_cent: model.subtotal_cent,
            iva_cent: model.iva_cent,
            retefuente_cent: model.retefuente_cent,
            total_cent: model.total_cent,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseItem {
    pub id: Uuid,
    pub variant_id: Uuid,
    pub qty: i32,
    pub unit_cost_cent: i64,
    pub iva_unit_cent: i64,
    pub line_subtotal_cent: i64,
}

impl From<entity::purchase_items::Model> for PurchaseItem {
    fn from(model: entity::purchase_items::Model) -> Self {
        Self {
            id: model.id,
            variant_id: model.variant_id,
            qty: model.qty,
            unit_cost_cent: model.unit_cost_cent,
            iva_unit_cent: model.iva_unit_cent,
            line_subtotal_cent: model.line_subtotal_cent,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Expense {
    pub id: Uuid,
    pub category: String,
    pub detail: Option<String>,
    pub amount_cent: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<entity::expenses::Model> for Expense {
    fn from(model: entity::expenses::Model) -> Self {
        Self {
            id: model.id,
            category: model.category,
            detail: model.detail,
            amount_cent: model.amount_cent,
            date: model.date,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreSettings {
    pub tax_percent: Decimal,
    pub shipping_fixed_cent: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_accepts_only_known_values() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert!("paid".parse::<OrderStatus>().is_err());
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }
}
