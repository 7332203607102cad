use axum::Router;

use crate::state::AppState;

pub mod addresses;
pub mod admin;
pub mod admin_catalog;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod purchases;
pub mod reports;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .nest("/addresses", addresses::router())
        .nest("/orders", orders::router())
        .nest(
            "/admin",
            admin::router()
                .merge(admin_catalog::router())
                .merge(purchases::router()),
        )
        .nest("/reports", reports::router())
}
