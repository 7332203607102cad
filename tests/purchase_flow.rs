mod common;

use common::{create_user, seed_product, setup_state, variant};
use storefront_api::{
    dto::purchases::{CreatePurchaseRequest, CreateSupplierRequest, PurchaseLineRequest},
    error::AppError,
    middleware::auth::Role,
    routes::params::{InventoryQuery, Pagination},
    services::{admin_service, purchase_service},
};
use uuid::Uuid;

fn line(variant_id: Uuid, qty: i32, unit_cost_cent: i64) -> PurchaseLineRequest {
    PurchaseLineRequest {
        variant_id,
        qty,
        unit_cost_cent,
        iva_unit_cent: 0,
    }
}

fn invoice(supplier_id: Uuid, items: Vec<PurchaseLineRequest>) -> CreatePurchaseRequest {
    CreatePurchaseRequest {
        supplier_id,
        items,
        invoice_number: None,
        notes: None,
    }
}

// Receiving blends weighted-average cost, rolls back whole invoices and feeds inventory valuation.
#[tokio::test]
async fn purchases_blend_cost_and_value_inventory() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin = create_user(&state, Role::Admin).await?;
    let socks = seed_product(&state, &admin, "Medias", 1_000, 0, 0, None).await?;

    let supplier = purchase_service::create_supplier(
        &state,
        &admin,
        CreateSupplierRequest {
            name: "  Textiles del Norte ".into(),
            tax_id: Some("900123456".into()),
            contact: Some(" ".into()),
        },
    )
    .await?
    .data
    .expect("supplier");
    assert_eq!(supplier.name, "Textiles del Norte");
    assert!(supplier.contact.is_none());

    // first receipt sets the cost, iva is per unit
    let mut first = invoice(supplier.id, vec![line(socks.variant_id, 10, 500)]);
    first.items[0].iva_unit_cent = 95;
    first.invoice_number = Some("FV-100".into());
    let created = purchase_service::create_purchase(&state, &admin, first)
        .await?
        .data
        .expect("purchase");
    assert_eq!(created.totals.subtotal_cent, 5_000);
    assert_eq!(created.totals.iva_cent, 950);
    assert_eq!(created.totals.retefuente_cent, 0);
    assert_eq!(created.totals.total_cent, 5_950);
    let v = variant(&state, socks.variant_id).await?;
    assert_eq!((v.stock, v.cost_cent), (10, 500));

    purchase_service::create_purchase(
        &state,
        &admin,
        invoice(supplier.id, vec![line(socks.variant_id, 10, 700)]),
    )
    .await?;
    let v = variant(&state, socks.variant_id).await?;
    assert_eq!((v.stock, v.cost_cent), (20, 600));

    // the same variant twice on one invoice blends line by line
    let repeated = purchase_service::create_purchase(
        &state,
        &admin,
        invoice(
            supplier.id,
            vec![line(socks.variant_id, 5, 2_000), line(socks.variant_id, 5, 1_000)],
        ),
    )
    .await?
    .data
    .expect("purchase");
    let v = variant(&state, socks.variant_id).await?;
    assert_eq!((v.stock, v.cost_cent), (30, 900));

    // items come back in invoice line order
    let lines = purchase_service::get_purchase(&state, &admin, repeated.purchase_id)
        .await?
        .data
        .expect("purchase")
        .items;
    let costs: Vec<i64> = lines.iter().map(|i| i.unit_cost_cent).collect();
    assert_eq!(costs, vec![2_000, 1_000]);

    // rejected invoices leave stock and cost untouched
    let err = purchase_service::create_purchase(
        &state,
        &admin,
        invoice(Uuid::new_v4(), vec![line(socks.variant_id, 5, 100)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = purchase_service::create_purchase(
        &state,
        &admin,
        invoice(
            supplier.id,
            vec![line(socks.variant_id, 5, 100), line(Uuid::new_v4(), 1, 100)],
        ),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = purchase_service::create_purchase(
        &state,
        &admin,
        invoice(supplier.id, vec![line(socks.variant_id, 0, 100)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // quantities that would overflow stock are rejected, not wrapped
    let err = purchase_service::create_purchase(
        &state,
        &admin,
        invoice(supplier.id, vec![line(socks.variant_id, i32::MAX, 1)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = purchase_service::create_purchase(&state, &admin, invoice(supplier.id, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let v = variant(&state, socks.variant_id).await?;
    assert_eq!((v.stock, v.cost_cent), (30, 900));

    let customer = create_user(&state, Role::Customer).await?;
    let err = purchase_service::create_purchase(
        &state,
        &customer,
        invoice(supplier.id, vec![line(socks.variant_id, 1, 100)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // history
    let listed = purchase_service::list_purchases(&state, &admin, Pagination::default()).await?;
    assert_eq!(listed.meta.as_ref().and_then(|m| m.total), Some(3));
    let purchases = listed.data.expect("purchases").items;
    assert_eq!(purchases.len(), 3);

    let detail = purchase_service::get_purchase(&state, &admin, created.purchase_id)
        .await?
        .data
        .expect("purchase");
    assert_eq!(detail.purchase.invoice_number.as_deref(), Some("FV-100"));
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].line_subtotal_cent, 5_000);
    assert_eq!(detail.items[0].iva_unit_cent, 95);

    let err = purchase_service::get_purchase(&state, &admin, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // valuation, lowest stock first
    let caps = seed_product(&state, &admin, "Gorra", 5_000, 3_000, 2, None).await?;
    let report = admin_service::inventory_valuation(&state, &admin, InventoryQuery::default())
        .await?
        .data
        .expect("inventory");
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].variant_id, caps.variant_id);
    assert_eq!(report.items[0].product, "Gorra");
    assert_eq!(report.items[0].profit_cent, 2_000);
    assert_eq!(report.items[0].margin_pct, 40.0);
    assert_eq!(report.items[1].variant_id, socks.variant_id);
    assert_eq!(report.items[1].stock_value_cost_cent, 27_000);
    assert_eq!(report.items[1].margin_pct, 10.0);
    assert_eq!(report.summary.variants, 2);
    assert_eq!(report.summary.units, 32);
    assert_eq!(report.summary.value_cost_cent, 33_000);
    assert_eq!(report.summary.value_sale_cent, 40_000);

    let low = admin_service::inventory_valuation(
        &state,
        &admin,
        InventoryQuery { threshold: Some(5) },
    )
    .await?
    .data
    .expect("inventory");
    assert_eq!(low.items.len(), 1);
    assert_eq!(low.items[0].variant_id, caps.variant_id);

    Ok(())
}
