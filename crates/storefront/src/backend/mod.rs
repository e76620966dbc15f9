//! Collaborator interfaces for the hosted backend.
//!
//! The storefront never authenticates anyone or queries rows itself. It asks
//! two collaborators:
//!
//! - [`IdentityProvider`] - sessions, sign-in/up/out and OAuth
//! - [`DataStore`] - bounded row listings from named tables
//!
//! Both are object-safe traits so handlers receive them through
//! [`AppState`](crate::state::AppState) and tests can substitute fakes.
//! [`SupabaseClient`] implements both against a Supabase project.

#[cfg(test)]
pub mod fake;
pub mod pkce;
mod supabase;

pub use supabase::SupabaseClient;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use easyshop_core::auth::AuthFailure;
use easyshop_core::{Email, SessionView};
use thiserror::Error;
use url::Url;

// =============================================================================
// Identity
// =============================================================================

/// A signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<Email>,
    /// `username` from the account's profile metadata.
    pub username: Option<String>,
}

impl AuthUser {
    /// Project the account into what a page is allowed to know.
    #[must_use]
    pub fn session_view(&self) -> SessionView {
        SessionView::authenticated(self.username.as_deref(), self.email.as_ref())
    }
}

/// Tokens plus the account they belong to.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which `access_token` is stale.
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// What a successful sign-up returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account must confirm its email before signing in.
    ConfirmationSent(AuthUser),
    /// The project auto-confirms; a session was issued immediately.
    SignedIn(AuthSession),
}

/// Supported OAuth identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

impl FromStr for OAuthProvider {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            other => Err(IdentityError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider answered with an error body.
    #[error("{message}")]
    Rejected {
        status: u16,
        /// Structured `error_code`, when the provider sends one.
        code: Option<String>,
        message: String,
    },

    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// OAuth provider name not supported by the storefront.
    #[error("unsupported OAuth provider: {0}")]
    UnsupportedProvider(String),
}

impl IdentityError {
    /// Classify for display on a credential form.
    #[must_use]
    pub fn failure(&self) -> AuthFailure {
        match self {
            Self::Rejected { code, message, .. } => AuthFailure::classify(code.as_deref(), message),
            other => AuthFailure::classify(None, other.to_string()),
        }
    }

    /// Whether the provider refused the presented token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 403, .. })
    }

    /// Whether the provider refused the request itself (any 4xx), as opposed
    /// to failing to answer.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Rejected { status: 400..=499, .. })
    }
}

/// The identity collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the account behind an access token.
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, IdentityError>;

    /// Trade a refresh token for a fresh session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, IdentityError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, IdentityError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, IdentityError>;

    /// Where to send the browser to start an OAuth (PKCE) sign-in.
    fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<Url, IdentityError>;

    /// Finish an OAuth sign-in with the code from the callback.
    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<AuthSession, IdentityError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}

// =============================================================================
// Data
// =============================================================================

/// Errors from the row store.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Non-success status from the row store.
    #[error("row store returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// The data collaborator.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Up to `limit` rows of `table`, in the store's order.
    async fn list(&self, table: &str, limit: u32) -> Result<Vec<serde_json::Value>, DataError>;
}
