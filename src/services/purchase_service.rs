use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    costing::{InvoiceTotals, ReceiptLine, StockPosition, validate_receipt},
    dto::purchases::{
        CreatePurchaseRequest, CreateSupplierRequest, PurchaseCreated, PurchaseList,
        PurchaseTotals, PurchaseWithItems, SupplierList,
    },
    entity::{
        product_variants::{ActiveModel as VariantActive, Entity as ProductVariants},
        purchase_items::{ActiveModel as PurchaseItemActive, Column as PurchaseItemCol, Entity as PurchaseItems},
        purchases::{ActiveModel as PurchaseActive, Column as PurchaseCol, Entity as Purchases},
        suppliers::{ActiveModel as SupplierActive, Column as SupplierCol, Entity as Suppliers},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Purchase, PurchaseItem, Supplier},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn create_supplier(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    ensure_admin(user)?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    let supplier = SupplierActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        tax_id: Set(non_blank(payload.tax_id)),
        contact: Set(non_blank(payload.contact)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "supplier_create",
        "suppliers",
        serde_json::json!({ "supplier_id": supplier.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Supplier created",
        Supplier::from(supplier),
        Some(Meta::empty()),
    ))
}

pub async fn list_suppliers(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<SupplierList>> {
    ensure_admin(user)?;
    let items: Vec<Supplier> = Suppliers::find()
        .order_by_asc(SupplierCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Supplier::from)
        .collect();
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Suppliers", SupplierList { items }, Some(meta)))
}

/// Each line re-reads its variant under a row lock, so a variant listed
/// twice blends against the stock and cost left by the earlier line.
pub async fn create_purchase(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePurchaseRequest,
) -> AppResult<ApiResponse<PurchaseCreated>> {
    ensure_admin(user)?;
    let lines: Vec<ReceiptLine> = payload.items.iter().copied().map(ReceiptLine::from).collect();
    validate_receipt(&lines)?;

    let txn = state.orm.begin().await?;

    let supplier = Suppliers::find_by_id(payload.supplier_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!("supplier {} does not exist", payload.supplier_id))
        })?;

    let header = PurchaseActive {
        id: Set(Uuid::new_v4()),
        supplier_id: Set(supplier.id),
        invoice_number: Set(non_blank(payload.invoice_number)),
        notes: Set(non_blank(payload.notes)),
        subtotal_cent: Set(0),
        iva_cent: Set(0),
        retefuente_cent: Set(0),
        total_cent: Set(0),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut totals = InvoiceTotals::default();
    for (line_no, line) in (0i32..).zip(&lines) {
        let variant = ProductVariants::find_by_id(line.variant_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!("variant {} does not exist", line.variant_id))
            })?;

        let before = StockPosition {
            stock: variant.stock,
            cost_cent: variant.cost_cent,
        };
        let after = before.receive(line.qty, line.unit_cost_cent)?;
        tracing::debug!(
            variant_id = %variant.id,
            prev_stock = before.stock,
            prev_cost_cent = before.cost_cent,
            stock = after.stock,
            cost_cent = after.cost_cent,
            "variant cost blended"
        );

        PurchaseItemActive {
            id: Set(Uuid::new_v4()),
            purchase_id: Set(header.id),
            variant_id: Set(variant.id),
            qty: Set(line.qty),
            unit_cost_cent: Set(line.unit_cost_cent),
            iva_unit_cent: Set(line.iva_unit_cent),
            line_subtotal_cent: Set(line.subtotal_cent()?),
            line_no: Set(line_no),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        totals.add(line)?;

        let mut active: VariantActive = variant.into();
        active.stock = Set(after.stock);
        active.cost_cent = Set(after.cost_cent);
        active.update(&txn).await?;
    }

    let mut header: PurchaseActive = header.into();
    header.subtotal_cent = Set(totals.subtotal_cent);
    header.iva_cent = Set(totals.iva_cent);
    header.retefuente_cent = Set(totals.retefuente_cent);
    header.total_cent = Set(totals.total_cent()?);
    let purchase = header.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        purchase_id = %purchase.id,
        supplier_id = %purchase.supplier_id,
        items = lines.len(),
        total_cent = purchase.total_cent,
        "purchase received"
    );

    audit::record(
        &state.pool,
        user.user_id,
        "purchase_create",
        "purchases",
        serde_json::json!({ "purchase_id": purchase.id, "total_cent": purchase.total_cent }),
    )
    .await;

    Ok(ApiResponse::success(
        "Purchase recorded",
        PurchaseCreated {
            purchase_id: purchase.id,
            totals: PurchaseTotals {
                subtotal_cent: purchase.subtotal_cent,
                iva_cent: purchase.iva_cent,
                retefuente_cent: purchase.retefuente_cent,
                total_cent: purchase.total_cent,
            },
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_purchases(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<PurchaseList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Purchases::find().order_by_desc(PurchaseCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Purchase::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Purchases", PurchaseList { items }, Some(meta)))
}

pub async fn get_purchase(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PurchaseWithItems>> {
    ensure_admin(user)?;
    let purchase = Purchases::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = PurchaseItems::find()
        .filter(PurchaseItemCol::PurchaseId.eq(purchase.id))
        .order_by_asc(PurchaseItemCol::LineNo)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PurchaseItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Purchase found",
        PurchaseWithItems {
            purchase: Purchase::from(purchase),
            items,
        },
        Some(Meta::empty()),
    ))
}
