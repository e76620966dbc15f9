//! Session-related types.
//!
//! Types stored in the server-side session. The visitor's cookie only holds
//! the session id.

use std::fmt;

use easyshop_core::{AuthFlow, Destination};
use serde::{Deserialize, Serialize};

use crate::backend::AuthSession;

/// Seconds before `expires_at` at which an access token is already treated
/// as stale.
const EXPIRY_LEEWAY_SECS: i64 = 30;

/// Identity tokens issued by the identity provider.
///
/// `Debug` redacts both tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds), when the provider reported one.
    pub expires_at: Option<i64>,
}

impl StoredTokens {
    /// Whether the access token should be refreshed before use at `now`.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| now >= expires_at - EXPIRY_LEEWAY_SECS)
    }
}

impl From<&AuthSession> for StoredTokens {
    fn from(session: &AuthSession) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at,
        }
    }
}

impl fmt::Debug for StoredTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Which page started an OAuth sign-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthOrigin {
    #[default]
    Login,
    Signup,
}

impl OAuthOrigin {
    /// Read the `from` query parameter of the OAuth start route.
    #[must_use]
    pub fn from_param(from: Option<&str>) -> Self {
        match from {
            Some("signup") => Self::Signup,
            _ => Self::Login,
        }
    }

    /// Flow whose message table applies to a failed callback.
    #[must_use]
    pub const fn flow(self) -> AuthFlow {
        match self {
            Self::Login => AuthFlow::Login,
            Self::Signup => AuthFlow::OAuthSignup,
        }
    }

    /// Page that shows a failed callback's message.
    #[must_use]
    pub const fn page(self) -> Destination {
        match self {
            Self::Login => Destination::Login,
            Self::Signup => Destination::Signup,
        }
    }
}

/// PKCE state kept between the OAuth start and its callback.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOAuth {
    pub verifier: String,
    pub origin: OAuthOrigin,
}

impl fmt::Debug for PendingOAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOAuth")
            .field("verifier", &"[REDACTED]")
            .field("origin", &self.origin)
            .finish()
    }
}

/// Session keys.
pub mod keys {
    /// Identity provider tokens for the signed-in visitor.
    pub const TOKENS: &str = "auth_tokens";

    /// PKCE verifier and origin page of an OAuth sign-in in progress.
    pub const PENDING_OAUTH: &str = "pending_oauth";

    /// Selected display language.
    pub const LOCALE: &str = "locale";

    /// One-shot message shown on the next credential page render.
    pub const FLASH: &str = "flash";
}
