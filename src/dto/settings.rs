use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub tax_percent: Option<Decimal>,
    pub shipping_fixed_cent: Option<i64>,
}
