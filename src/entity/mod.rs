pub mod addresses;
pub mod audit_logs;
pub mod categories;
pub mod expenses;
pub mod order_items;
pub mod orders;
pub mod product_images;
pub mod product_variants;
pub mod products;
pub mod purchase_items;
pub mod purchases;
pub mod settings;
pub mod suppliers;
pub mod users;

pub use addresses::Entity as Addresses;
pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use expenses::Entity as Expenses;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_images::Entity as ProductImages;
pub use product_variants::Entity as ProductVariants;
pub use products::Entity as Products;
pub use purchase_items::Entity as PurchaseItems;
pub use purchases::Entity as Purchases;
pub use settings::Entity as Settings;
pub use suppliers::Entity as Suppliers;
pub use users::Entity as Users;
