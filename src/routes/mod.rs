use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod home;
pub mod profile;
pub mod shop;

// Build the application router without binding state; it will be provided at the top level.
pub fn create_app_router() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .merge(checkout::router())
        .nest("/auth", auth::router())
        .nest("/shop", shop::router())
        .nest("/cart", cart::router())
        .nest("/profile", profile::router())
        .nest("/admin", admin::router())
}
