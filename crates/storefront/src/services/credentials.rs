//! Credential submissions: password login, signup and OAuth.
//!
//! Each submission makes at most one identity provider call. Provider
//! failures are classified into the form's fixed messages here, so route
//! handlers only decide how to render a [`FormOutcome`].

use easyshop_core::auth::{self, AuthFlow, FormOutcome};
use tracing::{info, instrument, warn};
use url::Url;

use crate::backend::pkce::PkcePair;
use crate::backend::{AuthSession, IdentityError, IdentityProvider, OAuthProvider, SignUpOutcome};
use crate::models::{OAuthOrigin, PendingOAuth};

/// An OAuth sign-in ready to redirect to the provider.
#[derive(Debug)]
pub struct OAuthStart {
    /// Provider authorize URL.
    pub authorize_url: Url,
    /// State to keep in the session until the callback.
    pub pending: PendingOAuth,
}

/// Credential operations against the identity provider.
pub struct CredentialService<'a> {
    identity: &'a dyn IdentityProvider,
}

impl<'a> CredentialService<'a> {
    #[must_use]
    pub const fn new(identity: &'a dyn IdentityProvider) -> Self {
        Self { identity }
    }

    /// Sign in with email and password.
    ///
    /// On success the caller stores the session and renders
    /// [`FormOutcome::login_succeeded`].
    ///
    /// # Errors
    ///
    /// Returns the failed outcome to render on the login form.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, FormOutcome> {
        match self
            .identity
            .sign_in_with_password(email.trim(), password)
            .await
        {
            Ok(session) => {
                info!(user_id = %session.user.id, "Signed in with password");
                Ok(session)
            }
            Err(e) => Err(failed(AuthFlow::Login, &e)),
        }
    }

    /// Register a new account.
    ///
    /// A mismatched confirmation is rejected before the provider is called.
    /// A successful signup always asks the visitor to confirm their email,
    /// even when the provider issued a session straight away; that session
    /// is not kept.
    #[instrument(skip(self, password, confirmation))]
    pub async fn sign_up(&self, email: &str, password: &str, confirmation: &str) -> FormOutcome {
        if let Err(rejected) = auth::confirm_password(password, confirmation) {
            return rejected;
        }

        match self.identity.sign_up(email.trim(), password).await {
            Ok(SignUpOutcome::ConfirmationSent(user)) => {
                info!(user_id = %user.id, "Signup confirmation sent");
                FormOutcome::signup_succeeded()
            }
            Ok(SignUpOutcome::SignedIn(session)) => {
                info!(user_id = %session.user.id, "Signup auto-confirmed");
                FormOutcome::signup_succeeded()
            }
            Err(e) => failed(AuthFlow::Signup, &e),
        }
    }

    /// Begin an OAuth (PKCE) sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's authorize URL cannot be built.
    pub fn start_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        origin: OAuthOrigin,
    ) -> Result<OAuthStart, IdentityError> {
        let pkce = PkcePair::generate();
        let authorize_url = self
            .identity
            .authorize_url(provider, redirect_to, &pkce.challenge)?;

        Ok(OAuthStart {
            authorize_url,
            pending: PendingOAuth {
                verifier: pkce.verifier,
                origin,
            },
        })
    }

    /// Finish an OAuth sign-in with the callback's authorization code.
    ///
    /// # Errors
    ///
    /// Returns the failed outcome to show on the page the flow started from.
    #[instrument(skip_all, fields(origin = ?pending.origin))]
    pub async fn finish_oauth(
        &self,
        auth_code: &str,
        pending: &PendingOAuth,
    ) -> Result<AuthSession, FormOutcome> {
        match self.identity.exchange_code(auth_code, &pending.verifier).await {
            Ok(session) => {
                info!(user_id = %session.user.id, "Signed in with OAuth");
                Ok(session)
            }
            Err(e) => Err(failed(pending.origin.flow(), &e)),
        }
    }
}

/// Log and classify a provider failure for `flow`.
fn failed(flow: AuthFlow, error: &IdentityError) -> FormOutcome {
    let failure = error.failure();
    warn!(?flow, kind = ?failure.kind, error = %error, "Credential request failed");
    FormOutcome::failed(flow, &failure)
}
