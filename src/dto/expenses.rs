use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Expense;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateExpenseRequest {
    pub category: String,
    pub detail: Option<String>,
    pub amount_cent: i64,
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseList {
    pub items: Vec<Expense>,
    pub total_cent: i64,
}
