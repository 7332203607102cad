use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems},
    entity::{
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        product_variants::{Column as VariantCol, Entity as ProductVariants},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus},
    pricing::{self, CartLine, PricingError, SaleVariant},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{address_service, settings_service},
    state::AppState,
};

/// Settings, address, variant locks, order rows and stock decrements all
/// go through one transaction; any error drops it and nothing is written.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let lines: Vec<CartLine> = payload.items.iter().copied().map(CartLine::from).collect();
    if lines.is_empty() {
        return Err(PricingError::EmptyCart.into());
    }

    let txn = state.orm.begin().await?;

    let settings = settings_service::load_pricing(&txn).await?;
    let address_id =
        address_service::resolve_for_checkout(&txn, user.user_id, payload.address_id).await?;
    let variants = lock_variants(&txn, &lines).await?;

    let quote = pricing::quote(&lines, &variants, &settings)?;
    let totals = quote.totals;
    tracing::debug!(
        user_id = %user.user_id,
        subtotal_cent = totals.subtotal_cent,
        discount_cent = totals.discount_cent,
        tax_cent = totals.tax_cent,
        shipping_cent = totals.shipping_cent,
        total_cent = totals.total_cent,
        "checkout priced"
    );

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        address_id: Set(address_id),
        status: Set(OrderStatus::Pending.as_str().into()),
        subtotal_cent: Set(totals.subtotal_cent),
        discount_cent: Set(totals.discount_cent),
        tax_cent: Set(totals.tax_cent),
        shipping_cent: Set(totals.shipping_cent),
        total_cent: Set(totals.total_cent),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for (line_no, line) in (0i32..).zip(&quote.lines) {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            variant_id: Set(line.variant_id),
            name_snapshot: Set(line.name_snapshot.clone()),
            color_snapshot: Set(line.color_snapshot.clone()),
            size_snapshot: Set(line.size_snapshot.clone()),
            cost_snapshot_cent: Set(line.cost_snapshot_cent),
            qty: Set(line.qty),
            unit_price_cent: Set(line.unit_price_cent),
            line_total_cent: Set(line.line_total_cent),
            line_no: Set(line_no),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        // guarded decrement: never lets stock go below zero
        let updated = ProductVariants::update_many()
            .col_expr(VariantCol::Stock, Expr::col(VariantCol::Stock).sub(line.qty))
            .filter(VariantCol::Id.eq(line.variant_id))
            .filter(VariantCol::Stock.gte(line.qty))
            .exec(&txn)
            .await?;
        if updated.rows_affected != 1 {
            return Err(AppError::Conflict(format!(
                "insufficient stock for variant {}",
                line.variant_id
            )));
        }
    }

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        items = quote.lines.len(),
        total_cent = totals.total_cent,
        "checkout completed"
    );

    audit::record(
        &state.pool,
        user.user_id,
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "total_cent": totals.total_cent }),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResponse {
            order_id: order.id,
            totals,
        },
        Some(Meta::empty()),
    ))
}

/// Lock every referenced variant row in id order, then join in product data.
async fn lock_variants<C: ConnectionTrait>(
    conn: &C,
    lines: &[CartLine],
) -> AppResult<HashMap<Uuid, SaleVariant>> {
    let mut ids: Vec<Uuid> = lines.iter().map(|l| l.variant_id).collect();
    ids.sort();
    ids.dedup();

    let variants = ProductVariants::find()
        .filter(VariantCol::Id.is_in(ids))
        .order_by_asc(VariantCol::Id)
        .lock(LockType::Update)
        .all(conn)
        .await?;

    let product_ids: Vec<Uuid> = variants.iter().map(|v| v.product_id).collect();
    let products: HashMap<Uuid, _> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let sale_variants = variants
        .into_iter()
        .filter_map(|v| {
            let product = products.get(&v.product_id)?;
            Some((
                v.id,
                SaleVariant {
                    id: v.id,
                    product_id: product.id,
                    product_name: product.name.clone(),
                    color: v.color,
                    size: v.size,
                    price_cent: v.price_cent,
                    cost_cent: v.cost_cent,
                    stock: v.stock,
                    active: v.active && product.active,
                    discount_percent: product.discount_percent,
                },
            ))
        })
        .collect();

    Ok(sale_variants)
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let scope = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    let (items, meta) = paginate_orders(&state.orm, scope, query).await?;
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = with_items(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

pub(crate) async fn paginate_orders<C: ConnectionTrait>(
    conn: &C,
    scope: Condition,
    query: OrderListQuery,
) -> AppResult<(Vec<OrderWithItems>, Meta)> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = scope;
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let finder: Select<Orders> = Orders::find().filter(condition);
    let finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(conn).await? as i64;
    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(conn)
        .await?;

    let items = with_items(conn, orders).await?;
    Ok((items, Meta::new(page, limit, total)))
}

pub(crate) async fn with_items<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<OrderWithItems>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(ids))
        .order_by_asc(OrderItemCol::LineNo)
        .all(conn)
        .await?
    {
        grouped.entry(item.order_id).or_default().push(OrderItem::from(item));
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderWithItems {
            items: grouped.remove(&order.id).unwrap_or_default(),
            order: Order::from(order),
        })
        .collect())
}
