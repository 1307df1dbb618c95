use std::sync::Arc;

use anyhow::Result;
use axum::{Extension, Router};
use chrono::Duration;
use factura_auth::TokenService;
use http::{HeaderValue, Method, header};
use identity::CredentialService;
use identity::infra::storage::{SeaOrmPendingCredentials, SeaOrmUsersRepository};
use invoicing::infra::storage::SeaOrmInvoiceRepository;
use invoicing::{InvoiceService, ServiceConfig};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, CorsConfig};

/// Connect to the configured database.
pub async fn connect_database(dsn: &str) -> Result<DatabaseConnection> {
    tracing::info!(dsn = %dsn, "connecting to database");
    Ok(Database::connect(dsn).await?)
}

/// Run all module migrations. Each module keeps its own migration table,
/// so the sets stay independent.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    identity::infra::storage::migrations::Migrator::up(db, None).await?;
    invoicing::infra::storage::migrations::Migrator::up(db, None).await?;
    Ok(())
}

/// Credential service over the SQLite-backed repositories.
#[must_use]
pub fn credential_service(db: &DatabaseConnection) -> Arc<CredentialService> {
    let users = Arc::new(SeaOrmUsersRepository::new(db.clone()));
    let pending = Arc::new(SeaOrmPendingCredentials::new(db.clone()));
    Arc::new(CredentialService::new(users, pending))
}

/// Assemble the HTTP application: module routers plus the shared token
/// service, request tracing, and CORS.
#[must_use]
pub fn build_router(db: &DatabaseConnection, config: &AppConfig) -> Router {
    let tokens = Arc::new(TokenService::new(
        &config.auth.secret,
        Duration::hours(config.auth.token_ttl_hours),
    ));

    let credentials = credential_service(db);
    let invoices = Arc::new(InvoiceService::new(
        Arc::new(SeaOrmInvoiceRepository::new(db.clone())),
        ServiceConfig {
            number_prefix: config.invoicing.number_prefix.clone(),
            default_currency: config.invoicing.default_currency.clone(),
        },
    ));

    identity::api::rest::router(credentials, tokens.clone())
        .merge(invoicing::api::rest::router(invoices))
        .layer(Extension(tokens))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors))
}

/// Allow configured origins plus any localhost origin, with credentials,
/// mirroring the browser flow of the frontend.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed = config.allowed_origins.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|origin| allowed.iter().any(|a| a == origin) || is_local_origin(origin))
                .unwrap_or(false)
        }))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Localhost with any port is always accepted, for dev convenience.
fn is_local_origin(origin: &str) -> bool {
    origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .map(|rest| {
            let host = rest.split(':').next().unwrap_or(rest);
            host == "localhost" || host == "127.0.0.1"
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_origins_are_accepted_with_any_port() {
        assert!(is_local_origin("http://localhost:5175"));
        assert!(is_local_origin("http://127.0.0.1"));
        assert!(is_local_origin("https://localhost"));
        assert!(!is_local_origin("https://evil.example.com"));
        assert!(!is_local_origin("http://localhost.example.com"));
    }
}
