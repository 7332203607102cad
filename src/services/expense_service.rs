use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::expenses::{CreateExpenseRequest, ExpenseList},
    entity::expenses::{ActiveModel as ExpenseActive, Column as ExpenseCol, Entity as Expenses},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Expense,
    reporting::optional_days,
    response::{ApiResponse, Meta},
    routes::params::DateRangeQuery,
    state::AppState,
};

pub async fn create_expense(
    state: &AppState,
    user: &AuthUser,
    payload: CreateExpenseRequest,
) -> AppResult<ApiResponse<Expense>> {
    ensure_admin(user)?;
    let category = payload.category.trim().to_string();
    if category.is_empty() {
        return Err(AppError::BadRequest("category is required".into()));
    }
    if payload.amount_cent <= 0 {
        return Err(AppError::BadRequest("amount_cent must be greater than 0".into()));
    }

    let expense = ExpenseActive {
        id: Set(Uuid::new_v4()),
        category: Set(category),
        detail: Set(payload.detail.filter(|d| !d.trim().is_empty())),
        amount_cent: Set(payload.amount_cent),
        date: Set(payload.date.unwrap_or_else(|| Utc::now().date_naive())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "expense_create",
        "expenses",
        serde_json::json!({ "expense_id": expense.id, "amount_cent": expense.amount_cent }),
    )
    .await;

    Ok(ApiResponse::success(
        "Expense recorded",
        Expense::from(expense),
        Some(Meta::empty()),
    ))
}

pub async fn list_expenses(
    state: &AppState,
    user: &AuthUser,
    query: DateRangeQuery,
) -> AppResult<ApiResponse<ExpenseList>> {
    ensure_admin(user)?;
    let (from, to) = optional_days(query.desde.as_deref(), query.hasta.as_deref())?;

    let mut condition = Condition::all();
    if let Some(from) = from {
        condition = condition.add(ExpenseCol::Date.gte(from));
    }
    if let Some(to) = to {
        condition = condition.add(ExpenseCol::Date.lte(to));
    }

    let items: Vec<Expense> = Expenses::find()
        .filter(condition)
        .order_by_desc(ExpenseCol::Date)
        .order_by_desc(ExpenseCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Expense::from)
        .collect();
    let total_cent = items.iter().map(|e| e.amount_cent).sum();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success(
        "Expenses",
        ExpenseList { items, total_cent },
        Some(meta),
    ))
}
