use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::reports::{BalanceSheetReport, IncomeStatementReport, KpiReport},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{BalanceQuery, DateRangeQuery},
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kpis", get(kpis))
        .route("/income-statement", get(income_statement))
        .route("/balance-sheet", get(balance_sheet))
}

#[utoipa::path(
    get,
    path = "/api/reports/kpis",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Sales KPIs and top 5 products", body = ApiResponse<KpiReport>),
        (status = 400, description = "Missing or malformed range"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn kpis(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<KpiReport>>> {
    let resp = report_service::kpis(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/income-statement",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Income statement", body = ApiResponse<IncomeStatementReport>),
        (status = 400, description = "Missing or malformed range"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn income_statement(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<IncomeStatementReport>>> {
    let resp = report_service::income_statement(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/balance-sheet",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balance sheet at a date", body = ApiResponse<BalanceSheetReport>),
        (status = 400, description = "Missing or malformed date"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn balance_sheet(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BalanceQuery>,
) -> AppResult<Json<ApiResponse<BalanceSheetReport>>> {
    let resp = report_service::balance_sheet(&state, &user, query).await?;
    Ok(Json(resp))
}
