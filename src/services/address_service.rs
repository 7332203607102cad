use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    audit,
    dto::addresses::{AddressList, CreateAddressRequest},
    entity::addresses::{ActiveModel as AddressActive, Column as AddressCol, Entity as Addresses},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Address,
    response::{ApiResponse, Meta},
    state::AppState,
};

const DEFAULT_COUNTRY: &str = "Colombia";

pub async fn list_addresses(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AddressList>> {
    let items: Vec<Address> = Addresses::find()
        .filter(AddressCol::UserId.eq(user.user_id))
        .order_by_desc(AddressCol::IsDefault)
        .order_by_desc(AddressCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Addresses", AddressList { items }, Some(meta)))
}

fn required(value: String, field: &str) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value)
}

pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let recipient = required(payload.recipient, "recipient")?;
    let department = required(payload.department, "department")?;
    let city = required(payload.city, "city")?;
    let street = required(payload.street, "street")?;
    let country = payload
        .country
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

    let txn = state.orm.begin().await?;

    let existing = Addresses::find()
        .filter(AddressCol::UserId.eq(user.user_id))
        .count(&txn)
        .await?;
    let make_default = payload.is_default || existing == 0;

    if make_default {
        Addresses::update_many()
            .col_expr(AddressCol::IsDefault, Expr::value(false))
            .filter(AddressCol::UserId.eq(user.user_id))
            .exec(&txn)
            .await?;
    }

    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        label: Set(payload.label),
        recipient: Set(recipient),
        department: Set(department),
        city: Set(city),
        street: Set(street),
        country: Set(country),
        is_default: Set(make_default),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "address_create",
        "addresses",
        serde_json::json!({ "address_id": address.id, "is_default": address.is_default }),
    )
    .await;

    Ok(ApiResponse::success(
        "Address created",
        Address::from(address),
        Some(Meta::empty()),
    ))
}

/// Shipping address for a checkout: the requested one if it belongs to the
/// buyer, else the buyer's default.
pub async fn resolve_for_checkout<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    address_id: Option<Uuid>,
) -> AppResult<Uuid> {
    let mut condition = Condition::all().add(AddressCol::UserId.eq(user_id));
    condition = match address_id {
        Some(id) => condition.add(AddressCol::Id.eq(id)),
        None => condition.add(AddressCol::IsDefault.eq(true)),
    };

    let address = Addresses::find().filter(condition).one(conn).await?;
    match (address, address_id) {
        (Some(a), _) => Ok(a.id),
        (None, Some(id)) => Err(AppError::Conflict(format!(
            "address {id} does not belong to the buyer"
        ))),
        (None, None) => Err(AppError::BadRequest(
            "address_id is required when no default address exists".into(),
        )),
    }
}
