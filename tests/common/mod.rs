#![allow(dead_code)]

use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use storefront_api::{
    db::{create_pool, run_migrations, state_from_pool},
    dto::{
        addresses::CreateAddressRequest,
        catalog::{CreateCategoryRequest, CreateProductRequest, CreateVariantRequest},
        settings::UpdateSettingsRequest,
    },
    entity::{product_variants, users::ActiveModel as UserActive, ProductVariants},
    middleware::auth::{AuthUser, Role},
    services::{address_service, catalog_service, settings_service},
    state::AppState,
};
use uuid::Uuid;

/// Fresh, migrated database, or `None` when no database is configured.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    let state = state_from_pool(pool);
    run_migrations(&state.orm).await?;

    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE audit_logs, expenses, purchase_items, purchases, suppliers, order_items, orders, \
             addresses, product_images, product_variants, products, categories, settings, users \
             RESTART IDENTITY CASCADE"
                .to_string(),
        ))
        .await?;

    Ok(Some(state))
}

pub async fn create_user(state: &AppState, role: Role) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    UserActive {
        id: Set(id),
        name: Set(format!("{role} {}", &id.to_string()[..8])),
        email: Set(format!("{id}@example.com")),
        role: Set(role.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser { user_id: id, role })
}

/// Customer with a default address, ready to check out.
pub async fn create_buyer(state: &AppState) -> anyhow::Result<(AuthUser, Uuid)> {
    let buyer = create_user(state, Role::Customer).await?;
    let address = address_service::create_address(
        state,
        &buyer,
        CreateAddressRequest {
            label: Some("Casa".into()),
            recipient: "Ana".into(),
            department: "Antioquia".into(),
            city: "Medellin".into(),
            street: "Calle 10 # 43-12".into(),
            country: None,
            is_default: false,
        },
    )
    .await?
    .data
    .expect("address");
    assert!(address.is_default);
    Ok((buyer, address.id))
}

pub async fn set_pricing(
    state: &AppState,
    admin: &AuthUser,
    tax_percent: i64,
    shipping_fixed_cent: i64,
) -> anyhow::Result<()> {
    settings_service::update_settings(
        state,
        admin,
        UpdateSettingsRequest {
            tax_percent: Some(Decimal::from(tax_percent)),
            shipping_fixed_cent: Some(shipping_fixed_cent),
        },
    )
    .await?;
    Ok(())
}

pub struct Seeded {
    pub product_id: Uuid,
    pub variant_id: Uuid,
}

/// One product with one variant in a fresh category.
pub async fn seed_product(
    state: &AppState,
    admin: &AuthUser,
    name: &str,
    price_cent: i64,
    cost_cent: i64,
    stock: i32,
    discount_percent: Option<i64>,
) -> anyhow::Result<Seeded> {
    let category = catalog_service::create_category(
        state,
        admin,
        CreateCategoryRequest { name: "Deportes".into() },
    )
    .await?
    .data
    .expect("category");

    let product = catalog_service::create_product(
        state,
        admin,
        CreateProductRequest {
            category_id: category.id,
            name: name.into(),
            short_description: None,
            discount_percent: discount_percent.map(Decimal::from),
            active: None,
        },
    )
    .await?
    .data
    .expect("product");

    let variant = catalog_service::create_variant(
        state,
        admin,
        product.id,
        CreateVariantRequest {
            sku: None,
            color: Some("Rojo".into()),
            size: Some("M".into()),
            price_cent,
            stock,
            cost_cent,
            active: None,
        },
    )
    .await?
    .data
    .expect("variant");

    Ok(Seeded {
        product_id: product.id,
        variant_id: variant.id,
    })
}

pub async fn variant(state: &AppState, id: Uuid) -> anyhow::Result<product_variants::Model> {
    Ok(ProductVariants::find_by_id(id)
        .one(&state.orm)
        .await?
        .expect("variant row"))
}
