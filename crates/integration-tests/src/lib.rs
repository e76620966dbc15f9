//! Integration tests for EasyShop.
//!
//! Each test drives the full storefront router in-process against a
//! `wiremock` stand-in for the Supabase project. No network access or
//! running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p easyshop-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use easyshop_storefront::config::{StorefrontConfig, SupabaseConfig};
use easyshop_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use wiremock::MockServer;

/// Anon key the storefront sends to the mock project.
pub const ANON_KEY: &str = "eyJhbGciOiJIUzI1NiJ9.integration_anon";

/// A storefront router wired to a mock Supabase project.
pub struct TestContext {
    pub supabase: MockServer,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let supabase = MockServer::start().await;
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: Url::parse("http://localhost:3000").unwrap(),
            supabase: SupabaseConfig::new(
                Url::parse(&supabase.uri()).unwrap(),
                SecretString::from(ANON_KEY),
                Duration::from_secs(2),
            ),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config).unwrap();

        Self {
            supabase,
            app: easyshop_storefront::app(state),
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }
}

/// The `name=value` pair of the response's session cookie.
pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A Supabase user object.
pub fn user_json(email: &str, username: Option<&str>) -> Value {
    let metadata = username.map_or_else(|| json!({}), |name| json!({ "username": name }));
    json!({
        "id": format!("user-{email}"),
        "email": email,
        "user_metadata": metadata,
    })
}

/// A Supabase token grant response valid for an hour.
pub fn session_json(email: &str, access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": format!("refresh-{access_token}"),
        "user": user_json(email, None),
    })
}
