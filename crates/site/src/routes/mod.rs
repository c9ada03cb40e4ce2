//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Store profile + featured products
//! GET  /health                   - Health check (in main)
//!
//! # Catalog
//! GET  /products                 - Product listing
//!
//! # Auth
//! GET  /login                    - Login page
//! POST /login                    - Email/password sign-in
//! GET  /register                 - Registration page
//! POST /register                 - Sign-up action
//! POST /auth/logout              - Sign out
//! GET  /auth/verify              - Email verification link target
//! POST /auth/resend-verification - Resend the verification email
//! GET  /auth/google              - Redirect to Google consent screen
//! GET  /auth/google/callback     - Google OAuth callback
//!
//! # Admin (non-admins redirect to /dashboard, anonymous to /login)
//! GET  /submit-blog              - Article submission form
//! POST /submit-blog              - Submit an article for review
//! GET  /topic-suggestion         - Topic suggestion form
//! POST /topic-suggestion         - Run the AI topic flow
//! GET  /dashboard                - Dashboard landing page (any signed-in user)
//! GET  /dashboard/products       - Product upload form + table
//! POST /dashboard/products       - Upload a product
//! GET  /dashboard/articles       - Moderation table (?status= filter)
//! POST /dashboard/articles/{id}/status - Overwrite an article's status
//! ```

pub mod auth;
pub mod blog;
pub mod dashboard;
pub mod home;
pub mod oauth;
pub mod products;
pub mod topics;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(auth::logout))
        .route("/verify", get(auth::verify_email))
        .route("/resend-verification", post(auth::resend_verification))
        // Google OAuth
        .route("/google", get(oauth::google_login))
        .route("/google/callback", get(oauth::google_callback))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route(
            "/products",
            get(dashboard::products_page).post(dashboard::upload_product),
        )
        .route("/articles", get(dashboard::articles_page))
        .route(
            "/articles/{id}/status",
            post(dashboard::update_article_status),
        )
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Store profile
        .route("/", get(home::home))
        // Catalog
        .route("/products", get(products::index))
        // Auth pages
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        // Admin pages outside the dashboard
        .route("/submit-blog", get(blog::submit_page).post(blog::submit))
        .route(
            "/topic-suggestion",
            get(topics::page).post(topics::suggest),
        )
        // Auth actions
        .nest("/auth", auth_routes())
        // Dashboard
        .nest("/dashboard", dashboard_routes())
}
