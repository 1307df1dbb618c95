//! End-to-end flow over the assembled application: seeding, login with
//! disclosed credentials, invoice lifecycle, and one-time disclosure.

use axum::Router;
use axum::body::Body;
use chrono::NaiveDate;
use factura_server::app;
use factura_server::config::AppConfig;
use http::{Request, StatusCode, header};
use identity::CredentialService;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt as _;

struct TestServer {
    app: Router,
    credentials: Arc<CredentialService>,
}

async fn test_server() -> TestServer {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // One pooled connection keeps the in-memory database shared.
    options.max_connections(1);
    let db: DatabaseConnection = Database::connect(options).await.unwrap();
    app::run_migrations(&db).await.unwrap();

    let config = AppConfig::default();
    TestServer {
        app: app::build_router(&db, &config),
        credentials: app::credential_service(&db),
    }
}

fn seed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Log in over HTTP and return the session cookie pair (`token=...`).
async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap();
    let response = server.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_owned()
}

fn with_cookie(method: &str, uri: &str, cookie: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie);
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn full_invoice_lifecycle() {
    let server = test_server().await;

    // Seed, then recover the generated plaintexts the way an operator
    // would: latest first (seller), then the admin's.
    assert!(server.credentials.seed(seed_date()).await.unwrap());
    let seller_cred = server.credentials.disclose().await.unwrap();
    let admin_cred = server.credentials.disclose().await.unwrap();
    assert_eq!(seller_cred.username, "seller_20260806");
    assert_eq!(admin_cred.username, "admin");

    let seller_cookie = login(&server, &seller_cred.username, &seller_cred.password).await;
    let admin_cookie = login(&server, &admin_cred.username, &admin_cred.password).await;

    // The cookie authenticates /api/me.
    let response = server
        .app
        .clone()
        .oneshot(with_cookie("GET", "/api/me", &admin_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["role"], "admin");

    // Seller creates an invoice; the number starts the 2026 sequence.
    let invoice = json!({
        "client_name": "Client A",
        "issue_date": "2026-08-06",
        "issue_time": "10:30:00",
        "lines": [
            { "description": "Item one", "quantity": 2.0, "unit_price": 500.0 },
            { "description": "Item two", "quantity": 1.0, "unit_price": 500.0 },
        ],
        "total": 1500.0,
    });
    let response = server
        .app
        .clone()
        .oneshot(with_cookie(
            "POST",
            "/api/invoices",
            &seller_cookie,
            Some(invoice),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["number"], "INV-2026-000001");

    // Listing is admin-only.
    let response = server
        .app
        .clone()
        .oneshot(with_cookie("GET", "/api/invoices", &seller_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = server
        .app
        .clone()
        .oneshot(with_cookie("GET", "/api/invoices", &admin_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // The stored total matches the sum of the persisted line amounts.
    let uri = format!("/api/invoices/{}", created["id"]);
    let response = server
        .app
        .clone()
        .oneshot(with_cookie("GET", &uri, &seller_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let full = body_json(response).await;
    let sum: f64 = full["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["amount"].as_f64().unwrap())
        .sum();
    assert!((full["total"].as_f64().unwrap() - sum).abs() < 1e-9);

    // Admin deletes; the invoice and its lines are gone.
    let response = server
        .app
        .clone()
        .oneshot(with_cookie("DELETE", &uri, &admin_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let response = server
        .app
        .clone()
        .oneshot(with_cookie("GET", &uri, &admin_cookie, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn credential_disclosure_over_http_is_one_time() {
    let server = test_server().await;
    server.credentials.seed(seed_date()).await.unwrap();

    // Drain the seeded pair, then rotate to create a fresh secret.
    server.credentials.disclose().await.unwrap();
    let admin_cred = server.credentials.disclose().await.unwrap();
    let admin_cookie = login(&server, &admin_cred.username, &admin_cred.password).await;

    let next_day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    let rotated = server.credentials.rotate_seller(next_day).await.unwrap();

    let response = server
        .app
        .clone()
        .oneshot(with_cookie(
            "GET",
            "/api/admin/seller-credentials",
            &admin_cookie,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disclosed = body_json(response).await;
    assert_eq!(disclosed["username"], rotated.as_str());

    // The rotated password works for login.
    login(&server, &rotated, disclosed["password"].as_str().unwrap()).await;

    // And can never be read again.
    let response = server
        .app
        .clone()
        .oneshot(with_cookie(
            "GET",
            "/api/admin/seller-credentials",
            &admin_cookie,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seller_of_day_is_public() {
    let server = test_server().await;
    server.credentials.seed(seed_date()).await.unwrap();

    let request = Request::builder()
        .uri("/api/seller-of-day")
        .body(Body::empty())
        .unwrap();
    let response = server.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "seller_20260806");
    assert!(body.get("password").is_none());
}
