//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (session-gated, hydrated listing)
//! GET  /cart                   - Cart page (session-gated)
//! GET  /health                 - Health check
//!
//! # Credentials
//! GET  /login                  - Login page
//! POST /login                  - Password sign-in (rate limited)
//! GET  /signup                 - Signup page
//! POST /signup                 - Account registration (rate limited)
//! POST /logout                 - Sign out
//!
//! # OAuth
//! GET  /auth/oauth/{provider}  - Redirect to the provider (`?from=signup`)
//! GET  /auth/callback          - Exchange the authorization code
//!
//! # Preferences
//! POST /locale                 - Toggle header language
//! ```

pub mod auth;
pub mod cart;
pub mod chrome;
pub mod home;
pub mod locale;
pub mod oauth;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the credential routes router.
pub fn credential_routes() -> Router<AppState> {
    let limiter = auth_rate_limiter();

    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(limiter.clone())),
        )
        .route(
            "/signup",
            get(auth::signup_page).merge(post(auth::signup).layer(limiter)),
        )
        .route("/logout", post(auth::logout))
}

/// Create the OAuth routes router.
pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/oauth/{provider}", get(oauth::start))
        .route("/callback", get(oauth::callback))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/cart", get(cart::show))
        .route("/locale", post(locale::switch))
        .route("/health", get(health))
        .merge(credential_routes())
        .nest("/auth", oauth_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Supabase.
async fn health() -> &'static str {
    "ok"
}
