//! Session gate wiring for route handlers.
//!
//! [`resolve_viewer`] runs the session gate against the request's session and
//! writes back any refreshed or revoked tokens. [`RequireViewer`] wraps it as
//! an extractor for pages with nothing to load in parallel.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use easyshop_core::{Email, SessionView};
use tower_sessions::Session;

use crate::backend::AuthUser;
use crate::error::{AppError, set_sentry_user};
use crate::models::{StoredTokens, session_keys};
use crate::services::{GateOutcome, SessionGate, TokenUpdate};
use crate::state::AppState;

/// A signed-in visitor.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user: AuthUser,
    pub session: SessionView,
}

/// Run the session gate for this request.
///
/// # Errors
///
/// Returns an error only if the session store cannot be read or written.
/// Identity provider failures resolve to a redirect instead.
pub async fn resolve_viewer(state: &AppState, session: &Session) -> Result<GateOutcome, AppError> {
    let stored: Option<StoredTokens> = session.get(session_keys::TOKENS).await?;
    let resolution = SessionGate::new(state.identity())
        .resolve(stored, chrono::Utc::now().timestamp())
        .await;

    match resolution.tokens {
        TokenUpdate::Keep => {}
        TokenUpdate::Replace(tokens) => session.insert(session_keys::TOKENS, tokens).await?,
        TokenUpdate::Clear => {
            session
                .remove::<StoredTokens>(session_keys::TOKENS)
                .await?;
        }
    }

    if let GateOutcome::Admit(user) = &resolution.outcome {
        set_sentry_user(&user.id, user.email.as_ref().map(Email::as_str));
    }

    Ok(resolution.outcome)
}

/// Extractor that requires a signed-in visitor.
///
/// Visitors without a valid session are redirected to the login page before
/// the handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn cart(RequireViewer(viewer): RequireViewer) -> impl IntoResponse {
///     format!("Welcome, {}", viewer.session.display_name.unwrap_or_default())
/// }
/// ```
pub struct RequireViewer(pub Viewer);

/// Why [`RequireViewer`] refused the request.
pub enum ViewerRejection {
    Redirect(&'static str),
    /// The session layer is missing from the router.
    MissingSession,
    Error(AppError),
}

impl IntoResponse for ViewerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(path) => Redirect::to(path).into_response(),
            Self::MissingSession => {
                tracing::error!("Session not found in request extensions");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Self::Error(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireViewer {
    type Rejection = ViewerRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(ViewerRejection::MissingSession)?;

        match resolve_viewer(state, &session)
            .await
            .map_err(ViewerRejection::Error)?
        {
            GateOutcome::Admit(user) => Ok(Self(Viewer {
                session: user.session_view(),
                user,
            })),
            GateOutcome::Redirect(destination) => {
                Err(ViewerRejection::Redirect(destination.path()))
            }
        }
    }
}
