use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::reports::{BalanceSheetReport, IncomeStatementReport, KpiReport},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    reporting::{self, OrderFact, ReportRange, SoldItem},
    response::{ApiResponse, Meta},
    routes::params::{BalanceQuery, DateRangeQuery},
    state::AppState,
};

async fn sales_in(state: &AppState, range: ReportRange) -> AppResult<(Vec<OrderFact>, Vec<SoldItem>)> {
    let orders = Orders::find()
        .filter(OrderCol::CreatedAt.between(range.start, range.end))
        .order_by_asc(OrderCol::CreatedAt)
        .order_by_asc(OrderCol::Id)
        .all(&state.orm)
        .await?;
    if orders.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut items = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(ids.iter().copied()))
        .all(&state.orm)
        .await?;
    // order items follow their order's position in the range, then checkout line order
    let rank: HashMap<Uuid, usize> = ids.iter().enumerate().map(|(n, id)| (*id, n)).collect();
    items.sort_by_key(|i| (rank.get(&i.order_id).copied(), i.line_no));

    let facts = orders
        .iter()
        .map(|o| OrderFact {
            order_id: o.id,
            total_cent: o.total_cent,
        })
        .collect();
    let sold = items
        .into_iter()
        .map(|i| SoldItem {
            product_id: i.product_id,
            name_snapshot: i.name_snapshot,
            qty: i.qty,
            line_total_cent: i.line_total_cent,
            cost_snapshot_cent: i.cost_snapshot_cent,
        })
        .collect();
    Ok((facts, sold))
}

pub async fn kpis(
    state: &AppState,
    user: &AuthUser,
    query: DateRangeQuery,
) -> AppResult<ApiResponse<KpiReport>> {
    ensure_admin(user)?;
    let range = ReportRange::parse(query.desde.as_deref(), query.hasta.as_deref())?;
    let (orders, items) = sales_in(state, range).await?;
    let figures = reporting::kpis(&orders, &items);

    let report = KpiReport::new(
        query.desde.unwrap_or_default(),
        query.hasta.unwrap_or_default(),
        figures,
    );
    Ok(ApiResponse::success("KPIs", report, Some(Meta::empty())))
}

pub async fn income_statement(
    state: &AppState,
    user: &AuthUser,
    query: DateRangeQuery,
) -> AppResult<ApiResponse<IncomeStatementReport>> {
    ensure_admin(user)?;
    let range = ReportRange::parse(query.desde.as_deref(), query.hasta.as_deref())?;
    let (orders, items) = sales_in(state, range).await?;
    let figures = reporting::income_statement(&orders, &items);

    let report = IncomeStatementReport::new(
        query.desde.unwrap_or_default(),
        query.hasta.unwrap_or_default(),
        figures,
    );
    Ok(ApiResponse::success("Income statement", report, Some(Meta::empty())))
}

pub async fn balance_sheet(
    state: &AppState,
    user: &AuthUser,
    query: BalanceQuery,
) -> AppResult<ApiResponse<BalanceSheetReport>> {
    ensure_admin(user)?;
    let cutoff: DateTime<Utc> = reporting::as_of(query.al.as_deref())?;

    let (cash_cent,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total_cent), 0)::BIGINT FROM orders WHERE created_at <= $1",
    )
    .bind(cutoff)
    .fetch_one(&state.pool)
    .await?;

    let (inventory_cent,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(stock::BIGINT * cost_cent), 0)::BIGINT FROM product_variants",
    )
    .fetch_one(&state.pool)
    .await?;

    let figures = reporting::balance_sheet(cash_cent, inventory_cent);
    let report = BalanceSheetReport::new(query.al.unwrap_or_default(), figures);
    Ok(ApiResponse::success("Balance sheet", report, Some(Meta::empty())))
}
