use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use factura_auth::TokenService;

use crate::domain::service::CredentialService;

use super::handlers;

/// Identity routes: login, current user, public seller-of-day, and the
/// admin-only one-time credential disclosure.
pub fn router(service: Arc<CredentialService>, tokens: Arc<TokenService>) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/me", get(handlers::me))
        .route("/api/seller-of-day", get(handlers::seller_of_day))
        .route("/api/admin/seller-credentials", get(handlers::disclose))
        .layer(Extension(service))
        .layer(Extension(tokens))
}
