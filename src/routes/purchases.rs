use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::purchases::{
        CreatePurchaseRequest, CreateSupplierRequest, PurchaseCreated, PurchaseList,
        PurchaseWithItems, SupplierList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Supplier,
    response::ApiResponse,
    routes::params::Pagination,
    services::purchase_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route("/purchases", get(list_purchases).post(create_purchase))
        .route("/purchases/{id}", get(get_purchase))
}

#[utoipa::path(
    get,
    path = "/api/admin/suppliers",
    responses(
        (status = 200, description = "Suppliers by name", body = ApiResponse<SupplierList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Purchasing"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SupplierList>>> {
    let resp = purchase_service::list_suppliers(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 200, description = "Supplier created", body = ApiResponse<Supplier>),
        (status = 400, description = "Missing name"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Purchasing"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = purchase_service::create_supplier(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/purchases",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Purchases, newest first", body = ApiResponse<PurchaseList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Purchasing"
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PurchaseList>>> {
    let resp = purchase_service::list_purchases(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/purchases",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 200, description = "Invoice received; stock and cost updated", body = ApiResponse<PurchaseCreated>),
        (status = 400, description = "Empty or malformed lines"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Unknown supplier or variant")
    ),
    security(("bearer_auth" = [])),
    tag = "Purchasing"
)]
pub async fn create_purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePurchaseRequest>,
) -> AppResult<Json<ApiResponse<PurchaseCreated>>> {
    let resp = purchase_service::create_purchase(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/purchases/{id}",
    params(("id" = Uuid, Path, description = "Purchase ID")),
    responses(
        (status = 200, description = "Purchase with items", body = ApiResponse<PurchaseWithItems>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Purchasing"
)]
pub async fn get_purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PurchaseWithItems>>> {
    let resp = purchase_service::get_purchase(&state, &user, id).await?;
    Ok(Json(resp))
}
