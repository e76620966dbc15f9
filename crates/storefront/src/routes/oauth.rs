//! OAuth (PKCE) sign-in routes.
//!
//! `start` keeps the PKCE verifier in the session and sends the visitor to
//! the provider. `callback` exchanges the returned code for a session.
//! Failures are flashed to the page the flow started from.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use easyshop_core::{AuthFailure, Destination, Email, FormMessage, FormOutcome};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::backend::OAuthProvider;
use crate::error::{AppError, set_sentry_user};
use crate::models::{OAuthOrigin, PendingOAuth, StoredTokens, session_keys};
use crate::services::CredentialService;
use crate::state::AppState;

/// Query parameters for the OAuth start route.
#[derive(Debug, Deserialize)]
pub struct StartQuery {
    /// `signup` when started from the signup page.
    pub from: Option<String>,
}

/// Query parameters the provider sends back.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Begin an OAuth sign-in with `provider`.
#[instrument(skip(state, session))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    Path(provider): Path<String>,
    Query(query): Query<StartQuery>,
) -> Result<Response, AppError> {
    let provider: OAuthProvider = provider.parse()?;
    let origin = OAuthOrigin::from_param(query.from.as_deref());
    let callback_url = state
        .config()
        .oauth_callback_url()
        .map_err(|e| AppError::Internal(format!("OAuth callback URL: {e}")))?;

    let oauth = CredentialService::new(state.identity()).start_oauth(
        provider,
        callback_url.as_str(),
        origin,
    )?;
    session
        .insert(session_keys::PENDING_OAUTH, oauth.pending)
        .await?;

    Ok(Redirect::to(oauth.authorize_url.as_str()).into_response())
}

/// Finish an OAuth sign-in.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let Some(pending) = session
        .remove::<PendingOAuth>(session_keys::PENDING_OAUTH)
        .await?
    else {
        warn!("OAuth callback without a pending sign-in");
        return fail(&session, OAuthOrigin::Login, "missing OAuth state").await;
    };

    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or(error);
        warn!(%description, "OAuth provider returned an error");
        return fail(&session, pending.origin, &description).await;
    }

    let Some(code) = query.code.filter(|code| !code.is_empty()) else {
        return fail(&session, pending.origin, "missing authorization code").await;
    };

    match CredentialService::new(state.identity())
        .finish_oauth(&code, &pending)
        .await
    {
        Ok(signed_in) => {
            session.cycle_id().await?;
            session
                .insert(session_keys::TOKENS, StoredTokens::from(&signed_in))
                .await?;
            set_sentry_user(
                &signed_in.user.id,
                signed_in.user.email.as_ref().map(Email::as_str),
            );
            Ok(Redirect::to(Destination::Home.path()).into_response())
        }
        Err(outcome) => flash(&session, pending.origin, outcome.message()).await,
    }
}

/// Classify `reason` for the origin's flow and flash it.
async fn fail(session: &Session, origin: OAuthOrigin, reason: &str) -> Result<Response, AppError> {
    let failure = AuthFailure::classify(None, reason);
    let outcome = FormOutcome::failed(origin.flow(), &failure);
    flash(session, origin, outcome.message()).await
}

async fn flash(
    session: &Session,
    origin: OAuthOrigin,
    message: FormMessage,
) -> Result<Response, AppError> {
    session.insert(session_keys::FLASH, message).await?;
    Ok(Redirect::to(origin.page().path()).into_response())
}
