use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
        reports::{InventoryReport, InventoryRow, InventorySummary},
    },
    entity::{
        orders::{ActiveModel as OrderActive, Entity as Orders},
        product_variants::{Column as VariantCol, Entity as ProductVariants},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderStatus},
    reporting::valuate,
    response::{ApiResponse, Meta},
    routes::params::{InventoryQuery, OrderListQuery},
    services::order_service,
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (items, meta) = order_service::paginate_orders(&state.orm, Condition::all(), query).await?;
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = order_service::with_items(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

/// Only the status moves; the monetary columns stay as checkout wrote them.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status: OrderStatus = payload.status.trim().parse()?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous = existing.status.clone();

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": previous, "to": order.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}

pub async fn inventory_valuation(
    state: &AppState,
    user: &AuthUser,
    query: InventoryQuery,
) -> AppResult<ApiResponse<InventoryReport>> {
    ensure_admin(user)?;

    let mut finder = ProductVariants::find();
    if let Some(threshold) = query.threshold {
        finder = finder.filter(VariantCol::Stock.lte(threshold));
    }
    let variants = finder
        .order_by_asc(VariantCol::Stock)
        .order_by_asc(VariantCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let names: HashMap<Uuid, String> = Products::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let mut summary = InventorySummary::default();
    let items: Vec<InventoryRow> = variants
        .into_iter()
        .map(|v| {
            let value = valuate(v.stock, v.cost_cent, v.price_cent);
            summary.variants += 1;
            summary.units += i64::from(v.stock);
            summary.value_cost_cent += value.value_at_cost_cent;
            summary.value_sale_cent += value.value_at_sale_cent;
            InventoryRow {
                variant_id: v.id,
                product_id: v.product_id,
                product: names.get(&v.product_id).cloned().unwrap_or_default(),
                sku: v.sku,
                color: v.color,
                size: v.size,
                stock: v.stock,
                cost_cent: v.cost_cent,
                price_cent: v.price_cent,
                profit_cent: value.unit_profit_cent,
                margin_pct: value.margin_pct,
                stock_value_cost_cent: value.value_at_cost_cent,
                stock_value_sale_cent: value.value_at_sale_cent,
                active: v.active,
            }
        })
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success(
        "Inventory",
        InventoryReport { items, summary },
        Some(meta),
    ))
}
