use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use crate::{
    audit,
    dto::settings::UpdateSettingsRequest,
    entity::settings::{ActiveModel as SettingsActive, Entity as Settings},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::StoreSettings,
    pricing::PricingSettings,
    response::{ApiResponse, Meta},
    state::AppState,
};

const SETTINGS_ID: i32 = 1;

/// Pricing settings for one checkout, with defaults when row 1 is absent.
/// Takes any connection so checkout can read inside its transaction.
pub async fn load_pricing<C: ConnectionTrait>(conn: &C) -> AppResult<PricingSettings> {
    let settings = Settings::find_by_id(SETTINGS_ID)
        .one(conn)
        .await?
        .map(|row| PricingSettings {
            tax_percent: row.tax_percent,
            shipping_fixed_cent: row.shipping_fixed_cent,
        })
        .unwrap_or_default();
    Ok(settings)
}

pub async fn get_settings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<StoreSettings>> {
    ensure_admin(user)?;
    let current = load_pricing(&state.orm).await?;
    Ok(ApiResponse::success(
        "Settings",
        StoreSettings {
            tax_percent: current.tax_percent,
            shipping_fixed_cent: current.shipping_fixed_cent,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_settings(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateSettingsRequest,
) -> AppResult<ApiResponse<StoreSettings>> {
    ensure_admin(user)?;
    if let Some(tax) = payload.tax_percent {
        if tax < Decimal::ZERO || tax > Decimal::ONE_HUNDRED {
            return Err(AppError::BadRequest("tax_percent must be between 0 and 100".into()));
        }
    }
    if payload.shipping_fixed_cent.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest("shipping_fixed_cent must not be negative".into()));
    }

    let existing = Settings::find_by_id(SETTINGS_ID).one(&state.orm).await?;
    let saved = match existing {
        Some(row) => {
            let mut active: SettingsActive = row.into();
            if let Some(tax) = payload.tax_percent {
                active.tax_percent = Set(tax);
            }
            if let Some(shipping) = payload.shipping_fixed_cent {
                active.shipping_fixed_cent = Set(shipping);
            }
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?
        }
        None => {
            let defaults = PricingSettings::default();
            SettingsActive {
                id: Set(SETTINGS_ID),
                tax_percent: Set(payload.tax_percent.unwrap_or(defaults.tax_percent)),
                shipping_fixed_cent: Set(payload
                    .shipping_fixed_cent
                    .unwrap_or(defaults.shipping_fixed_cent)),
                updated_at: Set(Utc::now().into()),
            }
            .insert(&state.orm)
            .await?
        }
    };

    audit::record(
        &state.pool,
        user.user_id,
        "settings_update",
        "settings",
        serde_json::json!({
            "tax_percent": saved.tax_percent,
            "shipping_fixed_cent": saved.shipping_fixed_cent,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Settings updated",
        StoreSettings {
            tax_percent: saved.tax_percent,
            shipping_fixed_cent: saved.shipping_fixed_cent,
        },
        Some(Meta::empty()),
    ))
}
