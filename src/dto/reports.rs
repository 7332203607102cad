//! Report payloads. Figures leave the service in major currency units,
//! rounded to two decimals, under the field names the back office reads.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    money::{to_major, to_major_f64},
    reporting::{BalanceFigures, IncomeFigures, KpiFigures, ProductSales},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct TopProduct {
    pub producto_id: Uuid,
    pub nombre: String,
    pub cantidad: i64,
    pub ingreso: f64,
}

impl From<ProductSales> for TopProduct {
    fn from(p: ProductSales) -> Self {
        Self {
            producto_id: p.product_id,
            nombre: p.name,
            cantidad: p.qty,
            ingreso: to_major(p.revenue_cent),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KpiReport {
    pub desde: String,
    pub hasta: String,
    pub ventas_totales: f64,
    pub boletas: i64,
    pub ticket_promedio: f64,
    pub top5_productos: Vec<TopProduct>,
}

impl KpiReport {
    pub fn new(desde: String, hasta: String, figures: KpiFigures) -> Self {
        Self {
            desde,
            hasta,
            ventas_totales: to_major(figures.sales_cent),
            boletas: figures.order_count,
            ticket_promedio: to_major_f64(figures.average_ticket_cent),
            top5_productos: figures.top_products.into_iter().map(TopProduct::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IncomeStatementReport {
    pub desde: String,
    pub hasta: String,
    pub ingresos: f64,
    pub costo_ventas: f64,
    pub utilidad_bruta: f64,
    pub impuestos: f64,
    pub utilidad_neta: f64,
}

impl IncomeStatementReport {
    pub fn new(desde: String, hasta: String, figures: IncomeFigures) -> Self {
        Self {
            desde,
            hasta,
            ingresos: to_major(figures.revenue_cent),
            costo_ventas: to_major(figures.cogs_cent),
            utilidad_bruta: to_major(figures.gross_profit_cent),
            impuestos: to_major(figures.taxes_cent),
            utilidad_neta: to_major(figures.net_profit_cent),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Assets {
    pub caja_estimada: f64,
    pub inventario: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Liabilities {
    pub cuentas_por_pagar: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceSheetReport {
    pub al: String,
    pub activos: Assets,
    pub pasivos: Liabilities,
    pub patrimonio: f64,
}

impl BalanceSheetReport {
    pub fn new(al: String, figures: BalanceFigures) -> Self {
        Self {
            al,
            activos: Assets {
                caja_estimada: to_major(figures.cash_cent),
                inventario: to_major(figures.inventory_cent),
            },
            pasivos: Liabilities {
                cuentas_por_pagar: to_major(figures.accounts_payable_cent),
            },
            patrimonio: to_major(figures.equity_cent),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryRow {
    pub variant_id: Uuid,
    pub product_id: Uuid,
    pub product: String,
    pub sku: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub stock: i32,
    pub cost_cent: i64,
    pub price_cent: i64,
    pub profit_cent: i64,
    pub margin_pct: f64,
    pub stock_value_cost_cent: i64,
    pub stock_value_sale_cent: i64,
    pub active: bool,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct InventorySummary {
    pub variants: i64,
    pub units: i64,
    pub value_cost_cent: i64,
    pub value_sale_cent: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryReport {
    pub items: Vec<InventoryRow>,
    pub summary: InventorySummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::{balance_sheet, income_statement, OrderFact, SoldItem};

    #[test]
    fn income_statement_is_shown_in_major_units() {
        let orders = [OrderFact { order_id: Uuid::new_v4(), total_cent: 119_000 }];
        let items = [SoldItem {
            product_id: Uuid::new_v4(),
            name_snapshot: "Balon".into(),
            qty: 1,
            line_total_cent: 100_000,
            cost_snapshot_cent: 50_000,
        }];
        let report = IncomeStatementReport::new(
            "2025-01-01".into(),
            "2025-01-31".into(),
            income_statement(&orders, &items),
        );
        assert_eq!(report.ingresos, 1_190.0);
        assert_eq!(report.costo_ventas, 500.0);
        assert_eq!(report.utilidad_bruta, 690.0);
        assert_eq!(report.utilidad_neta, 690.0);
        assert_eq!(report.desde, "2025-01-01");
    }

    #[test]
    fn balance_sheet_nests_assets_and_liabilities() {
        let report = BalanceSheetReport::new("2025-06-30".into(), balance_sheet(12_345, 10_000));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["activos"]["caja_estimada"], 123.45);
        assert_eq!(json["activos"]["inventario"], 100.0);
        assert_eq!(json["pasivos"]["cuentas_por_pagar"], 0.0);
        assert_eq!(json["patrimonio"], 223.45);
        assert_eq!(json["al"], "2025-06-30");
    }
}
