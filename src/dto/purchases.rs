use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    costing::ReceiptLine,
    models::{Purchase, PurchaseItem, Supplier},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSupplierRequest {
    pub name: String,
    pub tax_id: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PurchaseLineRequest {
    #[serde(alias = "variantId")]
    pub variant_id: Uuid,
    pub qty: i32,
    #[serde(alias = "unitCostCent")]
    pub unit_cost_cent: i64,
    #[serde(default, alias = "ivaUnitCent")]
    pub iva_unit_cent: i64,
}

impl From<PurchaseLineRequest> for ReceiptLine {
    fn from(line: PurchaseLineRequest) -> Self {
        ReceiptLine {
            variant_id: line.variant_id,
            qty: line.qty,
            unit_cost_cent: line.unit_cost_cent,
            iva_unit_cent: line.iva_unit_cent,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePurchaseRequest {
    #[serde(alias = "supplierId")]
    pub supplier_id: Uuid,
    pub items: Vec<PurchaseLineRequest>,
    #[serde(default, alias = "invoiceNumber")]
    pub invoice_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTotals {
    pub subtotal_cent: i64,
    pub iva_cent: i64,
    pub retefuente_cent: i64,
    pub total_cent: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCreated {
    pub purchase_id: Uuid,
    pub totals: PurchaseTotals,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseWithItems {
    pub purchase: Purchase,
    pub items: Vec<PurchaseItem>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PurchaseList {
    #[schema(value_type = Vec<Purchase>)]
    pub items: Vec<Purchase>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct SupplierList {
    #[schema(value_type = Vec<Supplier>)]
    pub items: Vec<Supplier>,
}
