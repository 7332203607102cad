pub mod address_service;
pub mod admin_service;
pub mod catalog_service;
pub mod expense_service;
pub mod order_service;
pub mod purchase_service;
pub mod report_service;
pub mod settings_service;
