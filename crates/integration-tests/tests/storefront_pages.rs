//! Integration tests for the session-gated storefront pages.
//!
//! Sign-in goes through the real login form so the session cookie and the
//! stored tokens are exactly what a browser would carry.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use easyshop_integration_tests::{
    TestContext, body_text, location, session_cookie, session_json, user_json,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mock_password_grant(ctx: &TestContext, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&ctx.supabase)
        .await;
}

async fn mock_user(ctx: &TestContext, access_token: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&ctx.supabase)
        .await;
}

async fn mock_rows(ctx: &TestContext, table: &str, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{table}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(&ctx.supabase)
        .await;
}

async fn sign_in(ctx: &TestContext) -> String {
    let response = ctx
        .post_form("/login", "email=jane%40x.com&password=hunter22", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

#[tokio::test]
async fn test_home_without_session_redirects_to_login() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let html = body_text(response).await;
    assert!(!html.contains("Welcome"));
}

#[tokio::test]
async fn test_signed_in_home_shows_email_local_part() {
    let ctx = TestContext::new().await;
    mock_password_grant(&ctx, session_json("jane@x.com", "access-1")).await;
    mock_user(&ctx, "access-1", user_json("jane@x.com", None)).await;
    mock_rows(&ctx, "products", json!([])).await;
    mock_rows(&ctx, "banners", json!([])).await;

    let cookie = sign_in(&ctx).await;
    let response = ctx.get("/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome, jane"));
    assert!(html.contains(r#"<span class="cart-badge">3</span>"#));
}

#[tokio::test]
async fn test_username_wins_over_email() {
    let ctx = TestContext::new().await;
    mock_password_grant(&ctx, session_json("jane@x.com", "access-1")).await;
    mock_user(&ctx, "access-1", user_json("jane@x.com", Some("JaneD"))).await;

    let cookie = sign_in(&ctx).await;
    let html = body_text(ctx.get("/", Some(&cookie)).await).await;

    assert!(html.contains("Welcome, JaneD"));
}

#[tokio::test]
async fn test_non_string_username_falls_back_to_email() {
    let ctx = TestContext::new().await;
    let user = json!({
        "id": "user-jane",
        "email": "jane@x.com",
        "user_metadata": { "username": 42 }
    });
    let mut session = session_json("jane@x.com", "access-1");
    session["user"] = user.clone();
    mock_password_grant(&ctx, session).await;
    mock_user(&ctx, "access-1", user).await;

    let cookie = sign_in(&ctx).await;
    let response = ctx.get("/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Welcome, jane"));
}

#[tokio::test]
async fn test_empty_products_render_placeholders() {
    let ctx = TestContext::new().await;
    mock_password_grant(&ctx, session_json("jane@x.com", "access-1")).await;
    mock_user(&ctx, "access-1", user_json("jane@x.com", None)).await;
    mock_rows(&ctx, "products", json!([])).await;

    let cookie = sign_in(&ctx).await;
    let html = body_text(ctx.get("/", Some(&cookie)).await).await;

    assert_eq!(html.matches(r#"class="product-card""#).count(), 4);
    for (n, price) in [(1, 20), (2, 40), (3, 60), (4, 80)] {
        assert!(html.contains(&format!("Top Product {n}")));
        assert!(html.contains(&format!("$ {price}")));
        assert!(html.contains(&format!(
            "https://via.placeholder.com/300x200?text=Top+{n}"
        )));
    }
    assert!(html.contains("/static/banners/banner1.jpg"));
}

#[tokio::test]
async fn test_live_products_and_banner() {
    let ctx = TestContext::new().await;
    mock_password_grant(&ctx, session_json("jane@x.com", "access-1")).await;
    mock_user(&ctx, "access-1", user_json("jane@x.com", None)).await;
    mock_rows(
        &ctx,
        "products",
        json!([
            { "id": 1, "name": "Desk Lamp", "price": 35, "image_url": "https://cdn.test/lamp.png", "rating": 5 },
            { "id": 2, "name": "Mug", "price": 8, "image_url": "https://cdn.test/mug.png" },
            { "id": 3, "name": "Broken", "price": -1, "image_url": "https://cdn.test/x.png" }
        ]),
    )
    .await;
    mock_rows(
        &ctx,
        "banners",
        json!([{ "id": 9, "image_url": "https://cdn.test/sale.jpg" }]),
    )
    .await;

    let cookie = sign_in(&ctx).await;
    let html = body_text(ctx.get("/", Some(&cookie)).await).await;

    assert_eq!(html.matches(r#"class="product-card""#).count(), 2);
    assert!(html.contains("Desk Lamp"));
    assert!(html.contains("⭐⭐⭐⭐⭐"));
    assert!(!html.contains("Top Product"));
    assert!(html.contains("https://cdn.test/sale.jpg"));
}

#[tokio::test]
async fn test_search_filters_case_insensitively() {
    let ctx = TestContext::new().await;
    mock_password_grant(&ctx, session_json("jane@x.com", "access-1")).await;
    mock_user(&ctx, "access-1", user_json("jane@x.com", None)).await;
    mock_rows(
        &ctx,
        "products",
        json!([
            { "id": 1, "name": "Desk Lamp", "price": 35, "image_url": "lamp.png" },
            { "id": 2, "name": "Mug", "price": 8, "image_url": "mug.png" }
        ]),
    )
    .await;

    let cookie = sign_in(&ctx).await;
    let html = body_text(ctx.get("/?q=LAMP", Some(&cookie)).await).await;

    assert!(html.contains("Desk Lamp"));
    assert!(!html.contains(">Mug<"));

    let html = body_text(ctx.get("/?q=lamp+", Some(&cookie)).await).await;
    assert_eq!(html.matches(r#"class="product-card""#).count(), 0);
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let ctx = TestContext::new().await;
    let mut expired = session_json("jane@x.com", "stale");
    expired["expires_at"] = json!(1);
    mock_password_grant(&ctx, expired).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_json("jane@x.com", "fresh")),
        )
        .expect(1)
        .mount(&ctx.supabase)
        .await;

    let cookie = sign_in(&ctx).await;
    let html = body_text(ctx.get("/", Some(&cookie)).await).await;
    assert!(html.contains("Welcome, jane"));
}

#[tokio::test]
async fn test_revoked_session_redirects_to_login() {
    let ctx = TestContext::new().await;
    mock_password_grant(&ctx, session_json("jane@x.com", "access-1")).await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "error_code": "bad_jwt",
            "msg": "invalid JWT"
        })))
        .mount(&ctx.supabase)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "error_code": "refresh_token_not_found",
            "msg": "Invalid Refresh Token: Refresh Token Not Found"
        })))
        .mount(&ctx.supabase)
        .await;

    let cookie = sign_in(&ctx).await;
    let response = ctx.get("/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_cart_requires_session() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/cart", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout_signs_out_and_returns_to_login() {
    let ctx = TestContext::new().await;
    mock_password_grant(&ctx, session_json("jane@x.com", "access-1")).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.supabase)
        .await;

    let cookie = sign_in(&ctx).await;
    let response = ctx.post_form("/logout", "", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_security_headers_on_pages() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/login", None).await;

    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("x-request-id").is_some());
    assert!(headers.get("content-security-policy").is_some());
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/static/js/app.js", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("data-redirect-to"));
}

#[tokio::test]
async fn test_fallback_banner_is_a_jpeg() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/static/banners/banner1.jpg", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/jpeg");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(&[0xFF, 0xD8]));
    assert!(bytes.ends_with(&[0xFF, 0xD9]));
    assert!(bytes.len() > 1024);
}
