//! Credential form route handlers.
//!
//! Handles password login, signup and sign-out against the identity
//! provider. Failures are rendered on the form that was submitted; a
//! successful submission renders its notice and leaves after a fixed delay.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use easyshop_core::auth::PasswordVisibility;
use easyshop_core::{DeferredRedirect, Destination, Email, FormMessage, FormOutcome};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::models::{StoredTokens, session_keys};
use crate::routes::chrome::Chrome;
use crate::services::{CredentialService, SessionGate};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Present when the visitor had the password revealed.
    pub show_password: Option<String>,
}

/// Signup form data.
#[derive(Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub show_password: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub chrome: Chrome,
    pub email: String,
    pub message: Option<FormMessage>,
    pub redirect: Option<DeferredRedirect>,
    pub visibility: PasswordVisibility,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub chrome: Chrome,
    pub email: String,
    pub message: Option<FormMessage>,
    pub redirect: Option<DeferredRedirect>,
    pub visibility: PasswordVisibility,
}

/// Message left by a failed OAuth callback, shown once.
async fn take_flash(session: &Session) -> Option<FormMessage> {
    session
        .remove::<FormMessage>(session_keys::FLASH)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read flash message");
            None
        })
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(session: Session) -> impl IntoResponse {
    LoginTemplate {
        chrome: Chrome::load(&session).await,
        email: String::new(),
        message: take_flash(&session).await,
        redirect: None,
        visibility: PasswordVisibility::default(),
    }
}

/// Handle login form submission.
///
/// On success the session ID is rotated before the tokens are stored.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let outcome = match CredentialService::new(state.identity())
        .sign_in(&form.email, &form.password)
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
            FormOutcome::login_succeeded()
        }
        Err(outcome) => outcome,
    };

    Ok(LoginTemplate {
        chrome: Chrome::load(&session).await,
        email: form.email,
        message: Some(outcome.message()),
        redirect: outcome.redirect(),
        visibility: PasswordVisibility::from_flag(form.show_password.is_some()),
    }
    .into_response())
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(session: Session) -> impl IntoResponse {
    SignupTemplate {
        chrome: Chrome::load(&session).await,
        email: String::new(),
        message: take_flash(&session).await,
        redirect: None,
        visibility: PasswordVisibility::default(),
    }
}

/// Handle signup form submission.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> impl IntoResponse {
    let outcome = CredentialService::new(state.identity())
        .sign_up(&form.email, &form.password, &form.confirm_password)
        .await;

    SignupTemplate {
        chrome: Chrome::load(&session).await,
        email: form.email,
        message: Some(outcome.message()),
        redirect: outcome.redirect(),
        visibility: PasswordVisibility::from_flag(form.show_password.is_some()),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out and return to the login page.
///
/// Provider errors are logged by the gate and never shown; the local
/// session is dropped either way.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let stored = session
        .get::<StoredTokens>(session_keys::TOKENS)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read tokens during sign-out");
            None
        });

    SessionGate::new(state.identity())
        .sign_out(stored.as_ref())
        .await;

    if let Err(e) = session.flush().await {
        warn!(error = %e, "Failed to flush session during sign-out");
    }
    clear_sentry_user();

    Redirect::to(Destination::Login.path()).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use easyshop_core::Locale;
    use easyshop_core::auth::messages;

    use super::*;

    #[test]
    fn test_failed_login_keeps_email_and_visibility() {
        let outcome = FormOutcome::Failed(messages::INVALID_CREDENTIALS.to_string());
        let html = LoginTemplate {
            chrome: Chrome::new(Locale::En),
            email: "jane@x.com".to_string(),
            message: Some(outcome.message()),
            redirect: outcome.redirect(),
            visibility: PasswordVisibility::Shown,
        }
        .render()
        .unwrap();

        assert!(html.contains(messages::INVALID_CREDENTIALS));
        assert!(html.contains(r#"value="jane@x.com""#));
        assert!(html.contains(r#"type="text""#));
        assert!(!html.contains("data-redirect-to"));
    }

    #[test]
    fn test_successful_login_schedules_redirect() {
        let outcome = FormOutcome::login_succeeded();
        let html = LoginTemplate {
            chrome: Chrome::new(Locale::En),
            email: "jane@x.com".to_string(),
            message: Some(outcome.message()),
            redirect: outcome.redirect(),
            visibility: PasswordVisibility::Hidden,
        }
        .render()
        .unwrap();

        assert!(html.contains(messages::LOGIN_SUCCEEDED));
        assert!(html.contains(r#"data-redirect-to="/""#));
        assert!(html.contains(r#"data-redirect-ms="1500""#));
        assert!(html.contains(r#"content="2;url=/""#));
    }

    #[test]
    fn test_successful_signup_redirects_to_login() {
        let outcome = FormOutcome::signup_succeeded();
        let html = SignupTemplate {
            chrome: Chrome::new(Locale::Ar),
            email: String::new(),
            message: Some(outcome.message()),
            redirect: outcome.redirect(),
            visibility: PasswordVisibility::Hidden,
        }
        .render()
        .unwrap();

        assert!(html.contains(messages::SIGNUP_SUCCEEDED));
        assert!(html.contains(r#"data-redirect-to="/login""#));
        assert!(html.contains(r#"data-redirect-ms="3000""#));
        assert!(html.contains("/auth/oauth/google?from=signup"));
    }
}
