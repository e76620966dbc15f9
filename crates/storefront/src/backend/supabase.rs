//! Supabase implementation of the identity and data collaborators.
//!
//! Talks to a project's GoTrue (`/auth/v1`) and PostgREST (`/rest/v1`)
//! endpoints with `reqwest`. Every request carries the project's public
//! `apikey`; authenticated auth calls swap the bearer token for the
//! visitor's access token.

use std::sync::Arc;

use async_trait::async_trait;
use easyshop_core::Email;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use super::{
    AuthSession, AuthUser, DataError, DataStore, IdentityError, IdentityProvider, OAuthProvider,
    SignUpOutcome,
};
use crate::config::SupabaseConfig;

/// Characters of a response body kept in logs and error messages.
const BODY_PREVIEW_CHARS: usize = 300;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    refresh_token: String,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
    /// Free-form JSON the account owner controls.
    user_metadata: Option<Value>,
}

impl UserResponse {
    /// `user_metadata.username` when it is a non-empty string.
    fn username(&self) -> Option<String> {
        self.user_metadata
            .as_ref()?
            .get("username")?
            .as_str()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    }
}

/// `/signup` returns a session when the project auto-confirms, a bare user
/// otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Box<SessionResponse>),
    User(UserResponse),
}

/// GoTrue error bodies come in several historical shapes.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_error(self, status: StatusCode) -> IdentityError {
        let message = self
            .msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
            .unwrap_or_else(|| status.to_string());
        IdentityError::Rejected {
            status: status.as_u16(),
            code: self.error_code,
            message,
        }
    }
}

impl From<UserResponse> for AuthUser {
    fn from(user: UserResponse) -> Self {
        let username = user.username();
        Self {
            id: user.id,
            email: user.email.filter(|e| !e.is_empty()).map(Email::from),
            username,
        }
    }
}

impl From<SessionResponse> for AuthSession {
    fn from(session: SessionResponse) -> Self {
        let expires_at = session.expires_at.or_else(|| {
            session
                .expires_in
                .map(|secs| chrono::Utc::now().timestamp() + secs)
        });
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_at,
            user: session.user.into(),
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for one Supabase project.
///
/// Cheap to clone; built once at startup and shared by every request.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
}

impl SupabaseClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                base_url: config.url.clone(),
                anon_key: config.anon_key.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.inner.base_url.join(path)
    }

    /// Attach `apikey` and a bearer token (the visitor's, or the anon key).
    fn authorize(&self, request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        let anon_key = self.inner.anon_key.expose_secret();
        request
            .header("apikey", anon_key)
            .bearer_auth(bearer.unwrap_or(anon_key))
    }

    /// Send an auth request and decode a success body as `T`.
    async fn send_auth<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, IdentityError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(status = %status, body = %preview(&body), "Auth request rejected");
            let error_body: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            return Err(error_body.into_error(status));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&body),
                "Failed to parse auth response"
            );
            IdentityError::Parse(e)
        })
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        payload: Value,
    ) -> Result<AuthSession, IdentityError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let request = self
            .authorize(self.inner.client.post(url), None)
            .json(&payload);
        let session: SessionResponse = self.send_auth(request).await?;
        Ok(session.into())
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    #[instrument(skip_all)]
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, IdentityError> {
        let url = self.endpoint("auth/v1/user")?;
        let request = self.authorize(self.inner.client.get(url), Some(access_token));
        let user: UserResponse = self.send_auth(request).await?;
        Ok(user.into())
    }

    #[instrument(skip_all)]
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, IdentityError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, IdentityError> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    #[instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, IdentityError> {
        let url = self.endpoint("auth/v1/signup")?;
        let request = self
            .authorize(self.inner.client.post(url), None)
            .json(&json!({ "email": email, "password": password }));

        let outcome = match self.send_auth::<SignUpResponse>(request).await? {
            SignUpResponse::Session(session) => SignUpOutcome::SignedIn((*session).into()),
            SignUpResponse::User(user) => SignUpOutcome::ConfirmationSent(user.into()),
        };
        Ok(outcome)
    }

    fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<Url, IdentityError> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "s256");
        Ok(url)
    }

    #[instrument(skip_all)]
    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<AuthSession, IdentityError> {
        self.token_grant(
            "pkce",
            json!({ "auth_code": auth_code, "code_verifier": code_verifier }),
        )
        .await
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .authorize(self.inner.client.post(url), Some(access_token))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let error_body: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        Err(error_body.into_error(status))
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    #[instrument(skip(self))]
    async fn list(&self, table: &str, limit: u32) -> Result<Vec<Value>, DataError> {
        let mut url = self.endpoint(&format!("rest/v1/{table}"))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("limit", &limit.to_string());

        let response = self.authorize(self.inner.client.get(url), None).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DataError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let rows: Vec<Value> = serde_json::from_str(&body)?;
        debug!(table, rows = rows.len(), "Listed rows");
        Ok(rows)
    }
}
