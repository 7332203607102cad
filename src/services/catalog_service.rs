use std::collections::HashSet;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::{
        CategoryList, CreateCategoryRequest, CreateImageRequest, CreateProductRequest,
        CreateVariantRequest, ImageList, ProductDetail, ProductList, SetActiveRequest,
        UpdateProductRequest, UpdateVariantRequest, VariantList,
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        product_images::{ActiveModel as ImageActive, Column as ImageCol, Entity as ProductImages},
        product_variants::{ActiveModel as VariantActive, Column as VariantCol, Entity as ProductVariants},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products, Model as ProductModel},
        purchase_items::{Column as PurchaseItemCol, Entity as PurchaseItems},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Product, ProductImage, Variant},
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    slug::{slugify, unique_slug},
    state::AppState,
};

fn required_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    Ok(name.to_string())
}

fn check_discount(discount: Option<Decimal>) -> AppResult<()> {
    if let Some(pct) = discount {
        if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
            return Err(AppError::BadRequest(
                "discount_percent must be between 0 and 100".into(),
            ));
        }
    }
    Ok(())
}

fn check_price(price_cent: i64) -> AppResult<()> {
    if price_cent <= 0 {
        return Err(AppError::BadRequest("price_cent must be greater than 0".into()));
    }
    Ok(())
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    search_products(state, query, false).await
}

pub async fn list_products_admin(
    state: &AppState,
    user: &AuthUser,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    search_products(state, query, true).await
}

async fn search_products(
    state: &AppState,
    query: ProductQuery,
    include_inactive: bool,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if !include_inactive {
        condition = condition.add(ProdCol::Active.eq(true));
    }

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(ProdCol::Name).ilike(pattern.clone()))
                .add(Expr::col(ProdCol::ShortDescription).ilike(pattern)),
        );
    }

    if let Some(slug) = query.category.as_ref().filter(|s| !s.is_empty()) {
        let category = Categories::find()
            .filter(CategoryCol::Slug.eq(slug.as_str()))
            .one(&state.orm)
            .await?;
        match category {
            Some(c) => condition = condition.add(ProdCol::CategoryId.eq(c.id)),
            None => {
                return Ok(ApiResponse::success(
                    "Products",
                    ProductList { items: Vec::new() },
                    Some(Meta::new(page, limit, 0)),
                ));
            }
        }
    }

    if query.min.is_some() || query.max.is_some() {
        let mut priced = Condition::all().add(VariantCol::Active.eq(true));
        if let Some(min) = query.min {
            priced = priced.add(VariantCol::PriceCent.gte(min));
        }
        if let Some(max) = query.max {
            priced = priced.add(VariantCol::PriceCent.lte(max));
        }
        let product_ids: Vec<Uuid> = ProductVariants::find()
            .select_only()
            .column(VariantCol::ProductId)
            .distinct()
            .filter(priced)
            .into_tuple()
            .all(&state.orm)
            .await?;
        condition = condition.add(ProdCol::Id.is_in(product_ids));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(ProdCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

async fn detail<C: ConnectionTrait>(
    conn: &C,
    product: ProductModel,
    only_active: bool,
) -> AppResult<ProductDetail> {
    let mut variants = product.find_related(ProductVariants);
    if only_active {
        variants = variants.filter(VariantCol::Active.eq(true));
    }
    let variants = variants
        .order_by_asc(VariantCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Variant::from)
        .collect();

    let images = product
        .find_related(ProductImages)
        .order_by_asc(ImageCol::SortOrder)
        .all(conn)
        .await?
        .into_iter()
        .map(ProductImage::from)
        .collect();

    Ok(ProductDetail {
        product: Product::from(product),
        variants,
        images,
    })
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductDetail>> {
    let product = Products::find_by_id(id)
        .filter(ProdCol::Active.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let data = detail(&state.orm, product, true).await?;
    Ok(ApiResponse::success("Product found", data, Some(Meta::empty())))
}

pub async fn get_product_by_slug(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<ProductDetail>> {
    let product = Products::find()
        .filter(ProdCol::Slug.eq(slug))
        .filter(ProdCol::Active.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let data = detail(&state.orm, product, true).await?;
    Ok(ApiResponse::success("Product found", data, Some(Meta::empty())))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = required_name(&payload.name)?;
    let base = slugify(&name);
    let taken: HashSet<String> = Categories::find()
        .select_only()
        .column(CategoryCol::Slug)
        .filter(CategoryCol::Slug.starts_with(base.as_str()))
        .into_tuple::<String>()
        .all(&state.orm)
        .await?
        .into_iter()
        .collect();

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(unique_slug(&base, &taken)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id, "slug": category.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

async fn ensure_category<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<()> {
    if Categories::find_by_id(id).one(conn).await?.is_none() {
        return Err(AppError::Conflict(format!("category {id} does not exist")));
    }
    Ok(())
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let name = required_name(&payload.name)?;
    check_discount(payload.discount_percent)?;
    ensure_category(&state.orm, payload.category_id).await?;

    let base = slugify(&name);
    let taken: HashSet<String> = Products::find()
        .select_only()
        .column(ProdCol::Slug)
        .filter(ProdCol::Slug.starts_with(base.as_str()))
        .into_tuple::<String>()
        .all(&state.orm)
        .await?
        .into_iter()
        .collect();
    let slug = unique_slug(&base, &taken);

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        name: Set(name),
        slug: Set(slug),
        short_description: Set(payload.short_description),
        discount_percent: Set(payload.discount_percent),
        active: Set(payload.active.unwrap_or(true)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = %product.id, slug = %product.slug, "product created");
    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "slug": product.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn get_product_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ProductDetail>> {
    ensure_admin(user)?;
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let data = detail(&state.orm, product, false).await?;
    Ok(ApiResponse::success("Product found", data, Some(Meta::empty())))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    check_discount(payload.discount_percent)?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut active: ProductActive = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(required_name(&name)?);
    }
    if let Some(category_id) = payload.category_id {
        ensure_category(&state.orm, category_id).await?;
        active.category_id = Set(category_id);
    }
    if let Some(description) = payload.short_description {
        active.short_description = Set(Some(description));
    }
    if payload.clear_discount {
        active.discount_percent = Set(None);
    } else if let Some(pct) = payload.discount_percent {
        active.discount_percent = Set(Some(pct));
    }

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn set_product_active(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SetActiveRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    active.active = Set(payload.active);
    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_toggle",
        "products",
        serde_json::json!({ "product_id": product.id, "active": product.active }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// Removes a product with its variants and images. Products whose variants
/// were ever received on a purchase must be deactivated instead.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let variant_ids: Vec<Uuid> = ProductVariants::find()
        .select_only()
        .column(VariantCol::Id)
        .filter(VariantCol::ProductId.eq(product.id))
        .into_tuple()
        .all(&state.orm)
        .await?;
    if !variant_ids.is_empty() {
        let received = PurchaseItems::find()
            .filter(PurchaseItemCol::VariantId.is_in(variant_ids))
            .count(&state.orm)
            .await?;
        if received > 0 {
            return Err(AppError::Conflict(format!(
                "product {id} has purchase history; deactivate it instead"
            )));
        }
    }

    product.delete(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn product_exists(state: &AppState, id: Uuid) -> AppResult<()> {
    if Products::find_by_id(id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

async fn ensure_sku_free(state: &AppState, sku: &str, except: Option<Uuid>) -> AppResult<()> {
    let mut finder = ProductVariants::find().filter(VariantCol::Sku.eq(sku));
    if let Some(id) = except {
        finder = finder.filter(VariantCol::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::Conflict(format!("sku {sku} already exists")));
    }
    Ok(())
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn list_variants(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<VariantList>> {
    ensure_admin(user)?;
    product_exists(state, product_id).await?;
    let items: Vec<Variant> = ProductVariants::find()
        .filter(VariantCol::ProductId.eq(product_id))
        .order_by_asc(VariantCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Variant::from)
        .collect();
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Variants", VariantList { items }, Some(meta)))
}

pub async fn create_variant(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: CreateVariantRequest,
) -> AppResult<ApiResponse<Variant>> {
    ensure_admin(user)?;
    check_price(payload.price_cent)?;
    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    if payload.cost_cent < 0 {
        return Err(AppError::BadRequest("cost_cent must not be negative".into()));
    }
    product_exists(state, product_id).await?;

    let sku = clean(payload.sku);
    if let Some(sku) = sku.as_deref() {
        ensure_sku_free(state, sku, None).await?;
    }

    let variant = VariantActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        sku: Set(sku),
        color: Set(clean(payload.color)),
        size: Set(clean(payload.size)),
        price_cent: Set(payload.price_cent),
        cost_cent: Set(payload.cost_cent),
        stock: Set(payload.stock),
        active: Set(payload.active.unwrap_or(true)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "variant_create",
        "product_variants",
        serde_json::json!({ "variant_id": variant.id, "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Variant created",
        Variant::from(variant),
        Some(Meta::empty()),
    ))
}

pub async fn update_variant(
    state: &AppState,
    user: &AuthUser,
    variant_id: Uuid,
    payload: UpdateVariantRequest,
) -> AppResult<ApiResponse<Variant>> {
    ensure_admin(user)?;
    let existing = ProductVariants::find_by_id(variant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut active: VariantActive = existing.into();

    if let Some(price) = payload.price_cent {
        check_price(price)?;
        active.price_cent = Set(price);
    }
    if let Some(sku) = payload.sku {
        let sku = clean(Some(sku));
        if let Some(sku) = sku.as_deref() {
            ensure_sku_free(state, sku, Some(variant_id)).await?;
        }
        active.sku = Set(sku);
    }
    if let Some(color) = payload.color {
        active.color = Set(clean(Some(color)));
    }
    if let Some(size) = payload.size {
        active.size = Set(clean(Some(size)));
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }

    let variant = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "variant_update",
        "product_variants",
        serde_json::json!({ "variant_id": variant.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Variant updated",
        Variant::from(variant),
        Some(Meta::empty()),
    ))
}

pub async fn list_images(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<ImageList>> {
    ensure_admin(user)?;
    product_exists(state, product_id).await?;
    let items: Vec<ProductImage> = ProductImages::find()
        .filter(ImageCol::ProductId.eq(product_id))
        .order_by_asc(ImageCol::SortOrder)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ProductImage::from)
        .collect();
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Images", ImageList { items }, Some(meta)))
}

pub async fn add_image(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: CreateImageRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    ensure_admin(user)?;
    let url = payload.url.trim().to_string();
    if url.is_empty() {
        return Err(AppError::BadRequest("url is required".into()));
    }
    product_exists(state, product_id).await?;

    let sort_order = match payload.sort_order {
        Some(n) => n,
        None => {
            ProductImages::find()
                .filter(ImageCol::ProductId.eq(product_id))
                .count(&state.orm)
                .await? as i32
        }
    };

    let image = ImageActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        url: Set(url),
        sort_order: Set(sort_order),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "image_create",
        "product_images",
        serde_json::json!({ "image_id": image.id, "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image added",
        ProductImage::from(image),
        Some(Meta::empty()),
    ))
}

pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    image_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = ProductImages::delete_many()
        .filter(ImageCol::Id.eq(image_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "image_delete",
        "product_images",
        serde_json::json!({ "image_id": image_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image deleted",
        serde_json::json!({ "id": image_id }),
        Some(Meta::empty()),
    ))
}
