pub mod addresses;
pub mod catalog;
pub mod expenses;
pub mod orders;
pub mod purchases;
pub mod reports;
pub mod settings;
