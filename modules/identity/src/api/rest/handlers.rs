use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;
use axum::response::IntoResponse;
use factura_auth::{CurrentUser, Role, TokenService, session_cookie};
use factura_errors::Problem;
use http::header;

use crate::domain::service::CredentialService;

use super::dto::{DisclosedCredentialDto, LoginRequest, SellerOfDayDto, UserResponse};

/// `POST /api/login`
pub async fn login(
    Extension(svc): Extension<Arc<CredentialService>>,
    Extension(tokens): Extension<Arc<TokenService>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, Problem> {
    let user = svc.verify(&req.username, &req.password).await?;
    let identity = user.identity();
    let token = tokens.issue(&identity).map_err(Problem::from)?;
    let cookie = session_cookie(&token, tokens.ttl_seconds());

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse {
            user: identity.into(),
        }),
    ))
}

/// `GET /api/me`
pub async fn me(CurrentUser(identity): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        user: identity.into(),
    })
}

/// `GET /api/seller-of-day` (public)
pub async fn seller_of_day(
    Extension(svc): Extension<Arc<CredentialService>>,
) -> Result<Json<SellerOfDayDto>, Problem> {
    let seller = svc.seller_of_day().await?;
    Ok(Json(seller.map(Into::into).unwrap_or_default()))
}

/// `GET /api/admin/seller-credentials`
///
/// One-time disclosure: the returned password is removed from the store
/// before this handler replies.
pub async fn disclose(
    CurrentUser(identity): CurrentUser,
    Extension(svc): Extension<Arc<CredentialService>>,
) -> Result<Json<DisclosedCredentialDto>, Problem> {
    identity.require_role(Role::Admin)?;
    let credential = svc.disclose().await?;
    Ok(Json(credential.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NewUser;
    use crate::domain::password;
    use crate::domain::repo::{PendingCredentials as _, UsersRepository as _};
    use crate::infra::storage::migrations::Migrator;
    use crate::infra::storage::{SeaOrmPendingCredentials, SeaOrmUsersRepository};
    use axum::Router;
    use axum::body::Body;
    use factura_auth::Identity;
    use http::{Request, StatusCode};
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;
    use serde_json::{Value, json};
    use tower::ServiceExt as _;

    struct TestCtx {
        app: Router,
        users: Arc<SeaOrmUsersRepository>,
        pending: Arc<SeaOrmPendingCredentials>,
        tokens: Arc<TokenService>,
    }

    async fn test_ctx() -> TestCtx {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let users = Arc::new(SeaOrmUsersRepository::new(db.clone()));
        let pending = Arc::new(SeaOrmPendingCredentials::new(db));
        let svc = Arc::new(CredentialService::new(users.clone(), pending.clone()));
        let tokens = Arc::new(TokenService::with_default_ttl("handler-tests"));
        let app = crate::api::rest::router(svc, tokens.clone());
        TestCtx {
            app,
            users,
            pending,
            tokens,
        }
    }

    async fn insert_user(ctx: &TestCtx, username: &str, role: Role, plain: &str) -> Identity {
        let user = ctx
            .users
            .insert(NewUser {
                username: username.to_owned(),
                password_hash: password::hash(plain).unwrap(),
                role,
                display_name: "Someone".to_owned(),
            })
            .await
            .unwrap();
        user.identity()
    }

    fn login_request(username: &str, plain: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/login")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "username": username, "password": plain }).to_string(),
            ))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn login_sets_cookie_and_returns_user() {
        let ctx = test_ctx().await;
        insert_user(&ctx, "admin", Role::Admin, "pw123").await;

        let response = ctx
            .app
            .clone()
            .oneshot(login_request("admin", "pw123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));

        let body = body_json(response).await;
        assert_eq!(body["user"]["username"], "admin");
        assert_eq!(body["user"]["role"], "admin");
    }

    #[tokio::test]
    async fn login_failures_share_one_error_shape() {
        let ctx = test_ctx().await;
        insert_user(&ctx, "admin", Role::Admin, "pw123").await;

        let wrong_password = ctx
            .app
            .clone()
            .oneshot(login_request("admin", "wrong"))
            .await
            .unwrap();
        let unknown_user = ctx
            .app
            .clone()
            .oneshot(login_request("nobody", "wrong"))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(wrong_password).await,
            body_json(unknown_user).await
        );
    }

    #[tokio::test]
    async fn me_returns_the_token_identity() {
        let ctx = test_ctx().await;
        let identity = insert_user(&ctx, "seller_20260806", Role::Seller, "pw").await;
        let jwt = ctx.tokens.issue(&identity).unwrap();

        let request = Request::builder()
            .uri("/api/me")
            .header(header::AUTHORIZATION, format!("Bearer {jwt}"))
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["user"]["username"], "seller_20260806");
        assert_eq!(body["user"]["role"], "seller");
    }

    #[tokio::test]
    async fn seller_of_day_is_empty_object_without_sellers() {
        let ctx = test_ctx().await;

        let request = Request::builder()
            .uri("/api/seller-of-day")
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({}));
    }

    #[tokio::test]
    async fn seller_of_day_never_carries_a_password() {
        let ctx = test_ctx().await;
        insert_user(&ctx, "seller_20260806", Role::Seller, "pw").await;

        let request = Request::builder()
            .uri("/api/seller-of-day")
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        let body = body_json(response).await;

        assert_eq!(body["username"], "seller_20260806");
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn disclosure_is_admin_gated_and_one_time() {
        let ctx = test_ctx().await;
        let admin = insert_user(&ctx, "admin", Role::Admin, "pw").await;
        let seller = insert_user(&ctx, "seller_20260806", Role::Seller, "pw").await;
        ctx.pending.put("seller_20260806", "beef00112233").await.unwrap();

        let seller_jwt = ctx.tokens.issue(&seller).unwrap();
        let request = Request::builder()
            .uri("/api/admin/seller-credentials")
            .header(header::AUTHORIZATION, format!("Bearer {seller_jwt}"))
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin_jwt = ctx.tokens.issue(&admin).unwrap();
        let request = Request::builder()
            .uri("/api/admin/seller-credentials")
            .header(header::AUTHORIZATION, format!("Bearer {admin_jwt}"))
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "seller_20260806");
        assert_eq!(body["password"], "beef00112233");

        // The plaintext was deleted on first read.
        let request = Request::builder()
            .uri("/api/admin/seller-credentials")
            .header(header::AUTHORIZATION, format!("Bearer {admin_jwt}"))
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
