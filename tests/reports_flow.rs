mod common;

use chrono::{Duration, Utc};
use common::{create_buyer, create_user, seed_product, set_pricing, setup_state};
use storefront_api::{
    dto::{
        expenses::CreateExpenseRequest,
        orders::{CheckoutItem, CheckoutRequest},
    },
    error::AppError,
    middleware::auth::Role,
    routes::params::{BalanceQuery, DateRangeQuery},
    services::{expense_service, order_service, report_service},
};
use uuid::Uuid;

fn cart(lines: &[(Uuid, i32)]) -> CheckoutRequest {
    CheckoutRequest {
        items: lines
            .iter()
            .map(|&(variant_id, qty)| CheckoutItem { variant_id, qty })
            .collect(),
        address_id: None,
    }
}

fn range(desde: &str, hasta: &str) -> DateRangeQuery {
    DateRangeQuery {
        desde: Some(desde.to_string()),
        hasta: Some(hasta.to_string()),
    }
}

// KPIs, income statement and balance sheet over real orders, plus expense bookkeeping.
#[tokio::test]
async fn reports_aggregate_orders_and_stock() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let today = Utc::now().date_naive();
    let today_s = today.format("%Y-%m-%d").to_string();
    let tomorrow_s = (today + Duration::days(1)).format("%Y-%m-%d").to_string();

    let admin = create_user(&state, Role::Admin).await?;
    let (buyer, _) = create_buyer(&state).await?;
    set_pricing(&state, &admin, 19, 0).await?;

    let x = seed_product(&state, &admin, "Producto X", 100_000, 50_000, 10, None).await?;
    let placed = order_service::checkout(&state, &buyer, cart(&[(x.variant_id, 1)]))
        .await?
        .data
        .expect("checkout");
    assert_eq!(placed.totals.total_cent, 119_000);

    let income = report_service::income_statement(&state, &admin, range(&today_s, &today_s))
        .await?
        .data
        .expect("income statement");
    assert_eq!(income.desde, today_s);
    assert_eq!(income.ingresos, 1190.0);
    assert_eq!(income.costo_ventas, 500.0);
    assert_eq!(income.utilidad_bruta, 690.0);
    assert_eq!(income.impuestos, 0.0);
    assert_eq!(income.utilidad_neta, 690.0);

    let kpis = report_service::kpis(&state, &admin, range(&today_s, &today_s))
        .await?
        .data
        .expect("kpis");
    assert_eq!(kpis.boletas, 1);
    assert_eq!(kpis.ventas_totales, 1190.0);
    assert_eq!(kpis.ticket_promedio, 1190.0);
    assert_eq!(kpis.top5_productos.len(), 1);
    assert_eq!(kpis.top5_productos[0].nombre, "Producto X");

    // ranking by units; ties keep first-seen order
    let a = seed_product(&state, &admin, "Producto A", 10_000, 4_000, 10, None).await?;
    let b = seed_product(&state, &admin, "Producto B", 10_000, 4_000, 10, None).await?;
    let c = seed_product(&state, &admin, "Producto C", 10_000, 4_000, 10, None).await?;
    let second = order_service::checkout(
        &state,
        &buyer,
        cart(&[(a.variant_id, 1), (b.variant_id, 3), (c.variant_id, 2)]),
    )
    .await?
    .data
    .expect("checkout");
    assert_eq!(second.totals.total_cent, 71_400);

    let kpis = report_service::kpis(&state, &admin, range(&today_s, &today_s))
        .await?
        .data
        .expect("kpis");
    assert_eq!(kpis.boletas, 2);
    assert_eq!(kpis.ventas_totales, 1904.0);
    assert_eq!(kpis.ticket_promedio, 952.0);
    let ranked: Vec<Uuid> = kpis.top5_productos.iter().map(|p| p.producto_id).collect();
    assert_eq!(ranked, vec![b.product_id, c.product_id, x.product_id, a.product_id]);
    assert_eq!(kpis.top5_productos[0].cantidad, 3);
    assert_eq!(kpis.top5_productos[0].ingreso, 300.0);

    // an empty window reports zeros
    let quiet = report_service::kpis(&state, &admin, range(&tomorrow_s, &tomorrow_s))
        .await?
        .data
        .expect("kpis");
    assert_eq!(quiet.boletas, 0);
    assert_eq!(quiet.ticket_promedio, 0.0);
    assert!(quiet.top5_productos.is_empty());

    let balance = report_service::balance_sheet(
        &state,
        &admin,
        BalanceQuery {
            al: Some(today_s.clone()),
        },
    )
    .await?
    .data
    .expect("balance sheet");
    assert_eq!(balance.al, today_s);
    assert_eq!(balance.activos.caja_estimada, 1904.0);
    // 9 * 50_000 + (9 + 7 + 8) * 4_000
    assert_eq!(balance.activos.inventario, 5460.0);
    assert_eq!(balance.pasivos.cuentas_por_pagar, 0.0);
    assert_eq!(balance.patrimonio, 7364.0);

    // bad input
    let err = report_service::kpis(&state, &admin, range(&tomorrow_s, &today_s))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let err = report_service::income_statement(&state, &admin, range("2024-13-01", &today_s))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let err = report_service::income_statement(&state, &admin, DateRangeQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let err = report_service::balance_sheet(&state, &admin, BalanceQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = report_service::kpis(&state, &buyer, range(&today_s, &today_s))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // expenses
    let yesterday = today - Duration::days(1);
    expense_service::create_expense(
        &state,
        &admin,
        CreateExpenseRequest {
            category: "Arriendo".into(),
            detail: Some("Local".into()),
            amount_cent: 1_500_000,
            date: Some(yesterday),
        },
    )
    .await?;
    let recorded = expense_service::create_expense(
        &state,
        &admin,
        CreateExpenseRequest {
            category: " Servicios ".into(),
            detail: Some("  ".into()),
            amount_cent: 250_000,
            date: None,
        },
    )
    .await?
    .data
    .expect("expense");
    assert_eq!(recorded.category, "Servicios");
    assert!(recorded.detail.is_none());
    assert_eq!(recorded.date, today);

    let err = expense_service::create_expense(
        &state,
        &admin,
        CreateExpenseRequest {
            category: "Varios".into(),
            detail: None,
            amount_cent: 0,
            date: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let all = expense_service::list_expenses(&state, &admin, DateRangeQuery::default())
        .await?
        .data
        .expect("expenses");
    assert_eq!(all.items.len(), 2);
    assert_eq!(all.total_cent, 1_750_000);
    assert_eq!(all.items[0].id, recorded.id);

    let only_today = expense_service::list_expenses(
        &state,
        &admin,
        DateRangeQuery {
            desde: Some(today_s.clone()),
            hasta: None,
        },
    )
    .await?
    .data
    .expect("expenses");
    assert_eq!(only_today.items.len(), 1);
    assert_eq!(only_today.total_cent, 250_000);

    Ok(())
}
