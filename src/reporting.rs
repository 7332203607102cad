//! Read-side financial aggregation.
//!
//! The report services fetch facts (orders, sold items, variant stock)
//! and hand them to the functions here. All sums are kept in minor units;
//! conversion to display currency is left to the response DTOs.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::error::AppError;

pub const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("{0} is required (YYYY-MM-DD)")]
    Missing(&'static str),
    #[error("{0} must be a date formatted YYYY-MM-DD")]
    Malformed(&'static str),
    #[error("desde must not be after hasta")]
    Inverted,
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

fn parse_day(raw: Option<&str>, field: &'static str) -> Result<NaiveDate, ReportError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ReportError::Missing(field))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ReportError::Malformed(field))
}

pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59 UTC of `day`, the inclusive upper bound used by every report.
pub fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    day.and_time(last_second).and_utc()
}

/// Inclusive `[desde 00:00:00, hasta 23:59:59]` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportRange {
    pub fn parse(desde: Option<&str>, hasta: Option<&str>) -> Result<Self, ReportError> {
        let from = parse_day(desde, "desde")?;
        let to = parse_day(hasta, "hasta")?;
        if from > to {
            return Err(ReportError::Inverted);
        }
        Ok(Self {
            start: start_of_day(from),
            end: end_of_day(to),
        })
    }
}

/// Blank means unbounded; anything else must parse.
pub fn optional_days(
    desde: Option<&str>,
    hasta: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ReportError> {
    let parse = |raw: Option<&str>, field| match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_day(Some(s), field).map(Some),
        None => Ok(None),
    };
    let from = parse(desde, "desde")?;
    let to = parse(hasta, "hasta")?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ReportError::Inverted);
        }
    }
    Ok((from, to))
}

pub fn as_of(al: Option<&str>) -> Result<DateTime<Utc>, ReportError> {
    parse_day(al, "al").map(end_of_day)
}

#[derive(Debug, Clone, Copy)]
pub struct OrderFact {
    pub order_id: Uuid,
    pub total_cent: i64,
}

#[derive(Debug, Clone)]
pub struct SoldItem {
    pub product_id: Uuid,
    pub name_snapshot: String,
    pub qty: i32,
    pub line_total_cent: i64,
    pub cost_snapshot_cent: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub product_id: Uuid,
    pub name: String,
    pub qty: i64,
    pub revenue_cent: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiFigures {
    pub order_count: i64,
    pub sales_cent: i64,
    pub average_ticket_cent: f64,
    pub top_products: Vec<ProductSales>,
}

pub fn kpis(orders: &[OrderFact], items: &[SoldItem]) -> KpiFigures {
    let order_count = orders.len() as i64;
    let sales_cent: i64 = orders.iter().map(|o| o.total_cent).sum();
    let average_ticket_cent = if order_count == 0 {
        0.0
    } else {
        sales_cent as f64 / order_count as f64
    };

    KpiFigures {
        order_count,
        sales_cent,
        average_ticket_cent,
        top_products: top_products(items, TOP_PRODUCTS),
    }
}

/// Products ranked by units sold. Ties keep the order in which products
/// were first seen in `items`.
pub fn top_products(items: &[SoldItem], limit: usize) -> Vec<ProductSales> {
    let mut slots: HashMap<Uuid, usize> = HashMap::new();
    let mut ranked: Vec<ProductSales> = Vec::new();

    for item in items {
        let slot = *slots.entry(item.product_id).or_insert_with(|| {
            ranked.push(ProductSales {
                product_id: item.product_id,
                name: item.name_snapshot.clone(),
                qty: 0,
                revenue_cent: 0,
            });
            ranked.len() - 1
        });
        let entry = &mut ranked[slot];
        entry.qty += i64::from(item.qty);
        entry.revenue_cent += item.line_total_cent;
    }

    ranked.sort_by(|a, b| b.qty.cmp(&a.qty));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeFigures {
    pub revenue_cent: i64,
    pub cogs_cent: i64,
    pub gross_profit_cent: i64,
    pub taxes_cent: i64,
    pub net_profit_cent: i64,
}

/// Revenue is billed totals; cost of sales comes from the cost snapshot
/// frozen on each order item.
pub fn income_statement(orders: &[OrderFact], items: &[SoldItem]) -> IncomeFigures {
    let revenue_cent: i64 = orders.iter().map(|o| o.total_cent).sum();
    let cogs_cent: i64 = items
        .iter()
        .map(|i| i64::from(i.qty) * i.cost_snapshot_cent)
        .sum();
    let gross_profit_cent = revenue_cent - cogs_cent;
    let taxes_cent = 0;

    IncomeFigures {
        revenue_cent,
        cogs_cent,
        gross_profit_cent,
        taxes_cent,
        net_profit_cent: gross_profit_cent - taxes_cent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceFigures {
    pub cash_cent: i64,
    pub inventory_cent: i64,
    pub accounts_payable_cent: i64,
    pub equity_cent: i64,
}

/// Cash is cumulative billed sales up to the cut-off; no outflows are
/// modelled and the only liability is a zero accounts-payable line.
pub fn balance_sheet(cash_cent: i64, inventory_cent: i64) -> BalanceFigures {
    let accounts_payable_cent = 0;
    BalanceFigures {
        cash_cent,
        inventory_cent,
        accounts_payable_cent,
        equity_cent: cash_cent + inventory_cent - accounts_payable_cent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub unit_profit_cent: i64,
    pub margin_pct: f64,
    pub value_at_cost_cent: i64,
    pub value_at_sale_cent: i64,
}

pub fn valuate(stock: i32, cost_cent: i64, price_cent: i64) -> Valuation {
    let unit_profit_cent = price_cent - cost_cent;
    let margin_pct = if price_cent > 0 {
        ((unit_profit_cent as f64 / price_cent as f64) * 10_000.0).round() / 100.0
    } else {
        0.0
    };
    Valuation {
        unit_profit_cent,
        margin_pct,
        value_at_cost_cent: i64::from(stock) * cost_cent,
        value_at_sale_cent: i64::from(stock) * price_cent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn item(product_id: Uuid, qty: i32, cost: i64) -> SoldItem {
        SoldItem {
            product_id,
            name_snapshot: format!("p-{}", &product_id.to_string()[..4]),
            qty,
            line_total_cent: 1_000 * i64::from(qty),
            cost_snapshot_cent: cost,
        }
    }

    #[test]
    fn range_covers_whole_days() {
        let range = ReportRange::parse(Some("2025-03-01"), Some("2025-03-31")).unwrap();
        assert_eq!(range.start.to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert_eq!(range.end.hour(), 23);
        assert_eq!(range.end.minute(), 59);
        assert_eq!(range.end.second(), 59);
        assert_eq!(range.end.date_naive().to_string(), "2025-03-31");
    }

    #[test]
    fn range_fails_closed() {
        assert_eq!(
            ReportRange::parse(None, Some("2025-01-01")),
            Err(ReportError::Missing("desde"))
        );
        assert_eq!(
            ReportRange::parse(Some("2025-01-01"), Some("01/02/2025")),
            Err(ReportError::Malformed("hasta"))
        );
        assert_eq!(
            ReportRange::parse(Some("2025-02-01"), Some("2025-01-01")),
            Err(ReportError::Inverted)
        );
        assert_eq!(as_of(Some("")), Err(ReportError::Missing("al")));
    }

    #[test]
    fn optional_days_allow_open_ends() {
        assert_eq!(optional_days(None, Some(" ")), Ok((None, None)));
        let (from, to) = optional_days(Some("2025-01-10"), None).unwrap();
        assert_eq!(from.map(|d| d.to_string()).as_deref(), Some("2025-01-10"));
        assert!(to.is_none());
        assert_eq!(
            optional_days(Some("2025-01-10"), Some("2025-01-09")),
            Err(ReportError::Inverted)
        );
        assert_eq!(optional_days(Some("10/01/2025"), None), Err(ReportError::Malformed("desde")));
    }

    #[test]
    fn kpis_without_orders_are_zero() {
        let k = kpis(&[], &[]);
        assert_eq!(k.order_count, 0);
        assert_eq!(k.sales_cent, 0);
        assert_eq!(k.average_ticket_cent, 0.0);
        assert!(k.top_products.is_empty());
    }

    #[test]
    fn kpis_average_ticket() {
        let orders = [
            OrderFact { order_id: Uuid::new_v4(), total_cent: 10_000 },
            OrderFact { order_id: Uuid::new_v4(), total_cent: 5_001 },
        ];
        let k = kpis(&orders, &[]);
        assert_eq!(k.order_count, 2);
        assert_eq!(k.sales_cent, 15_001);
        assert_eq!(k.average_ticket_cent, 7_500.5);
    }

    #[test]
    fn top_products_rank_by_units_not_order_count() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        // a appears in two orders selling 2 units, b in one order selling 3
        let items = [item(a, 1, 0), item(b, 3, 0), item(a, 1, 0)];
        let top = top_products(&items, 5);
        assert_eq!(top[0].product_id, b);
        assert_eq!(top[0].qty, 3);
        assert_eq!(top[1].product_id, a);
        assert_eq!(top[1].qty, 2);
        assert_eq!(top[1].revenue_cent, 2_000);
    }

    #[test]
    fn top_products_ties_keep_discovery_order_and_cap_at_limit() {
        let ids: Vec<Uuid> = (0..7).map(|_| Uuid::new_v4()).collect();
        let items: Vec<SoldItem> = ids.iter().map(|id| item(*id, 1, 0)).collect();
        let top = top_products(&items, TOP_PRODUCTS);
        assert_eq!(top.len(), 5);
        let ranked: Vec<Uuid> = top.iter().map(|p| p.product_id).collect();
        assert_eq!(ranked, ids[..5].to_vec());
    }

    #[test]
    fn income_statement_uses_cost_snapshots() {
        let orders = [OrderFact { order_id: Uuid::new_v4(), total_cent: 119_000 }];
        let items = [item(Uuid::new_v4(), 1, 50_000)];
        let figures = income_statement(&orders, &items);
        assert_eq!(figures.revenue_cent, 119_000);
        assert_eq!(figures.cogs_cent, 50_000);
        assert_eq!(figures.gross_profit_cent, 69_000);
        assert_eq!(figures.taxes_cent, 0);
        assert_eq!(figures.net_profit_cent, 69_000);
    }

    #[test]
    fn equity_is_cash_plus_inventory() {
        let b = balance_sheet(100_000, 25_000);
        assert_eq!(b.accounts_payable_cent, 0);
        assert_eq!(b.equity_cent, 125_000);
    }

    #[test]
    fn valuation_margin() {
        let v = valuate(4, 600, 1_000);
        assert_eq!(v.unit_profit_cent, 400);
        assert_eq!(v.margin_pct, 40.0);
        assert_eq!(v.value_at_cost_cent, 2_400);
        assert_eq!(v.value_at_sale_cent, 4_000);

        assert_eq!(valuate(1, 300, 900).margin_pct, 66.67);
    }
}
