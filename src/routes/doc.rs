use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        addresses::{AddressList, CreateAddressRequest},
        catalog::{
            CategoryList, CreateCategoryRequest, CreateImageRequest, CreateProductRequest,
            CreateVariantRequest, ImageList, ProductDetail, ProductList, SetActiveRequest,
            UpdateProductRequest, UpdateVariantRequest, VariantList,
        },
        expenses::{CreateExpenseRequest, ExpenseList},
        orders::{
            CheckoutItem, CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems,
            UpdateOrderStatusRequest,
        },
        purchases::{
            CreatePurchaseRequest, CreateSupplierRequest, PurchaseCreated, PurchaseLineRequest,
            PurchaseList, PurchaseTotals, PurchaseWithItems, SupplierList,
        },
        reports::{
            Assets, BalanceSheetReport, IncomeStatementReport, InventoryReport, InventoryRow,
            InventorySummary, KpiReport, Liabilities, TopProduct,
        },
        settings::UpdateSettingsRequest,
    },
    models::{
        Address, Category, Expense, Order, OrderItem, OrderStatus, Product, ProductImage,
        Purchase, PurchaseItem, StoreSettings, Supplier, Variant,
    },
    pricing::OrderTotals,
    response::{ApiResponse, Meta},
    routes::{
        addresses, admin, admin_catalog, health, orders, params, products, purchases, reports,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_categories,
        products::list_products,
        products::get_product,
        products::get_product_by_slug,
        addresses::list_addresses,
        addresses::create_address,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::inventory,
        admin::get_settings,
        admin::update_settings,
        admin::list_expenses,
        admin::create_expense,
        admin_catalog::create_category,
        admin_catalog::list_products,
        admin_catalog::create_product,
        admin_catalog::get_product,
        admin_catalog::update_product,
        admin_catalog::delete_product,
        admin_catalog::set_active,
        admin_catalog::list_variants,
        admin_catalog::create_variant,
        admin_catalog::update_variant,
        admin_catalog::list_images,
        admin_catalog::add_image,
        admin_catalog::delete_image,
        purchases::list_suppliers,
        purchases::create_supplier,
        purchases::list_purchases,
        purchases::create_purchase,
        purchases::get_purchase,
        reports::kpis,
        reports::income_statement,
        reports::balance_sheet
    ),
    components(
        schemas(
            Address,
            Category,
            Expense,
            Order,
            OrderItem,
            OrderStatus,
            Product,
            ProductImage,
            Purchase,
            PurchaseItem,
            StoreSettings,
            Supplier,
            Variant,
            OrderTotals,
            AddressList,
            CreateAddressRequest,
            CategoryList,
            CreateCategoryRequest,
            CreateImageRequest,
            CreateProductRequest,
            CreateVariantRequest,
            ImageList,
            ProductDetail,
            ProductList,
            SetActiveRequest,
            UpdateProductRequest,
            UpdateVariantRequest,
            VariantList,
            CreateExpenseRequest,
            ExpenseList,
            CheckoutItem,
            CheckoutRequest,
            CheckoutResponse,
            OrderList,
            OrderWithItems,
            UpdateOrderStatusRequest,
            CreatePurchaseRequest,
            CreateSupplierRequest,
            PurchaseCreated,
            PurchaseLineRequest,
            PurchaseList,
            PurchaseTotals,
            PurchaseWithItems,
            SupplierList,
            Assets,
            BalanceSheetReport,
            IncomeStatementReport,
            InventoryReport,
            InventoryRow,
            InventorySummary,
            KpiReport,
            Liabilities,
            TopProduct,
            UpdateSettingsRequest,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::DateRangeQuery,
            params::BalanceQuery,
            params::InventoryQuery,
            Meta,
            ApiResponse<ProductDetail>,
            ApiResponse<ProductList>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<PurchaseCreated>,
            ApiResponse<KpiReport>,
            ApiResponse<IncomeStatementReport>,
            ApiResponse<BalanceSheetReport>,
            ApiResponse<InventoryReport>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Public catalog browsing"),
        (name = "Addresses", description = "Customer shipping addresses"),
        (name = "Orders", description = "Checkout and customer orders"),
        (name = "Admin", description = "Order management, inventory, settings and expenses"),
        (name = "Admin catalog", description = "Categories, products, variants and images"),
        (name = "Purchasing", description = "Suppliers and purchase receiving"),
        (name = "Reports", description = "KPIs, income statement and balance sheet"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
