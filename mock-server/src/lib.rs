//! In-memory stand-in for the ombudsman REST backend.
//!
//! Serves the same routes the client consumes, with bearer authentication
//! and rotating refresh tokens. `AppState` exposes hooks to expire or revoke
//! tokens so tests can drive the client's refresh path.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod state;
pub mod users;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;

pub use error::ApiFailure;
pub use state::{AppState, Category, CategoryRef, Product, TokenPair, User, ADMIN_EMAIL, ADMIN_PASSWORD};

/// Router over a fresh state with the administrator seeded.
pub fn app() -> Router {
    app_with_state(AppState::new())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/auth/change-password", post(auth::change_password))
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/status", patch(users::update_status))
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/{id}",
            get(catalog::get_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::new()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}
