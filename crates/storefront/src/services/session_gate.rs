//! Session gate.
//!
//! Answers one question per page mount: is there a signed-in visitor, and if
//! so, what is their name? The gate never touches the session store itself.
//! It returns a [`GateResolution`] and the caller applies the token update.

use easyshop_core::{Destination, SessionView};
use tracing::{debug, info, warn};

use crate::backend::{AuthUser, IdentityProvider};
use crate::models::StoredTokens;

/// What happens to the page that asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Render the page for this account.
    Admit(AuthUser),
    /// Leave the page without rendering protected content.
    Redirect(Destination),
}

impl GateOutcome {
    /// The session projection a page may use.
    #[must_use]
    pub fn session_view(&self) -> SessionView {
        match self {
            Self::Admit(user) => user.session_view(),
            Self::Redirect(_) => SessionView::anonymous(),
        }
    }
}

/// How the stored tokens change after a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenUpdate {
    Keep,
    /// A refresh issued new tokens.
    Replace(StoredTokens),
    /// The provider no longer accepts the stored tokens.
    Clear,
}

/// Result of one session lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResolution {
    pub outcome: GateOutcome,
    pub tokens: TokenUpdate,
}

impl GateResolution {
    const fn redirect(tokens: TokenUpdate) -> Self {
        Self {
            outcome: GateOutcome::Redirect(Destination::Login),
            tokens,
        }
    }

    const fn admit(user: AuthUser, tokens: TokenUpdate) -> Self {
        Self {
            outcome: GateOutcome::Admit(user),
            tokens,
        }
    }
}

/// Session lookups against the identity provider.
pub struct SessionGate<'a> {
    identity: &'a dyn IdentityProvider,
}

impl<'a> SessionGate<'a> {
    #[must_use]
    pub const fn new(identity: &'a dyn IdentityProvider) -> Self {
        Self { identity }
    }

    /// Resolve the current session from the stored tokens.
    ///
    /// An expired access token is refreshed once. A token the provider
    /// refuses is also given one refresh attempt. Any failure resolves to a
    /// redirect to the login page; transport failures keep the stored tokens
    /// so the next mount can try again.
    pub async fn resolve(&self, stored: Option<StoredTokens>, now: i64) -> GateResolution {
        let Some(tokens) = stored else {
            debug!("No stored session");
            return GateResolution::redirect(TokenUpdate::Keep);
        };

        if tokens.is_expired(now) {
            debug!("Access token expired, refreshing");
            return self.refresh(&tokens).await;
        }

        match self.identity.get_user(&tokens.access_token).await {
            Ok(user) => GateResolution::admit(user, TokenUpdate::Keep),
            Err(e) if e.is_unauthorized() => {
                debug!(error = %e, "Access token refused, refreshing");
                self.refresh(&tokens).await
            }
            Err(e) => {
                warn!(error = %e, "Session lookup failed");
                GateResolution::redirect(TokenUpdate::Keep)
            }
        }
    }

    async fn refresh(&self, tokens: &StoredTokens) -> GateResolution {
        match self.identity.refresh_session(&tokens.refresh_token).await {
            Ok(session) => {
                info!(user_id = %session.user.id, "Session refreshed");
                let tokens = StoredTokens::from(&session);
                GateResolution::admit(session.user, TokenUpdate::Replace(tokens))
            }
            Err(e) if e.is_client_error() => {
                info!(error = %e, "Stored session no longer valid");
                GateResolution::redirect(TokenUpdate::Clear)
            }
            Err(e) => {
                warn!(error = %e, "Session refresh failed");
                GateResolution::redirect(TokenUpdate::Keep)
            }
        }
    }

    /// Revoke the session behind `stored`.
    ///
    /// Failures are logged and otherwise ignored: the caller forgets the
    /// tokens and redirects to the login page regardless.
    pub async fn sign_out(&self, stored: Option<&StoredTokens>) {
        let Some(tokens) = stored else {
            return;
        };
        match self.identity.sign_out(&tokens.access_token).await {
            Ok(()) => info!("Signed out"),
            Err(e) => warn!(error = %e, "Sign-out failed"),
        }
    }
}
