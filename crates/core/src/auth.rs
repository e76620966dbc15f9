//! Credential form policy: outcomes, destinations and error messages.
//!
//! The identity provider does the actual authentication. This module decides
//! what the visitor sees afterwards: which message, and where they are sent
//! next.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed user-facing strings for the credential forms.
pub mod messages {
    pub const EMAIL_NOT_CONFIRMED: &str =
        "❌ لم يتم تأكيد البريد الإلكتروني. يُرجى فتح الإيميل والضغط على رابط التفعيل.";
    pub const INVALID_CREDENTIALS: &str = "❌ البريد الإلكتروني أو كلمة المرور غير صحيحة.";
    pub const ALREADY_REGISTERED: &str = "❌ البريد الإلكتروني مسجل بالفعل.";
    pub const PASSWORD_MISMATCH: &str = "❌ كلمتا المرور غير متطابقتين.";
    pub const LOGIN_FAILED_PREFIX: &str = "❌ حصل خطأ أثناء تسجيل الدخول: ";
    pub const SIGNUP_FAILED_PREFIX: &str = "❌ حصل خطأ أثناء التسجيل: ";
    pub const OAUTH_SIGNUP_FAILED_PREFIX: &str = "❌ Google signup failed: ";
    pub const LOGIN_SUCCEEDED: &str = "✅ تم تسجيل الدخول بنجاح! جاري التوجيه...";
    pub const SIGNUP_SUCCEEDED: &str =
        "✅ تم إرسال رسالة تأكيد إلى بريدك الإلكتروني. يُرجى التفعيل قبل تسجيل الدخول.";
}

/// Delay before leaving the login page after a successful sign-in.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Delay before leaving the signup page after a successful sign-up.
pub const SIGNUP_REDIRECT_DELAY: Duration = Duration::from_millis(3000);

/// Fixed navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Home,
    Login,
    Signup,
    Cart,
}

impl Destination {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Cart => "/cart",
        }
    }
}

/// A navigation that happens after a fixed, non-cancellable delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredRedirect {
    pub to: Destination,
    pub after: Duration,
}

impl DeferredRedirect {
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.to.path()
    }

    /// Delay in whole milliseconds.
    #[must_use]
    pub fn delay_ms(&self) -> u128 {
        self.after.as_millis()
    }

    /// Delay rounded up to whole seconds, for `<meta http-equiv="refresh">`.
    #[must_use]
    pub fn delay_secs_ceil(&self) -> u64 {
        let secs = self.after.as_secs();
        if self.after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

/// Which credential action produced a failure.
///
/// Each flow recognizes its own set of failures and has its own prefix for
/// anything unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    /// Password sign-in, or OAuth started from the login page.
    Login,
    /// Email + password registration.
    Signup,
    /// OAuth started from the signup page.
    OAuthSignup,
}

/// Recognized identity-provider failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    EmailNotConfirmed,
    InvalidCredentials,
    AlreadyRegistered,
    Unrecognized,
}

/// An identity-provider failure, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub kind: AuthFailureKind,
    /// The provider's message, shown verbatim for unrecognized failures.
    pub message: String,
}

impl AuthFailure {
    /// Classify a provider error.
    ///
    /// A structured `code` decides when it is one the storefront knows.
    /// Otherwise the message text is searched for the provider's known
    /// phrases.
    #[must_use]
    pub fn classify(code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = code
            .and_then(kind_from_code)
            .unwrap_or_else(|| kind_from_message(&message));
        Self { kind, message }
    }

    /// The text shown on the form for a failure during `flow`.
    #[must_use]
    pub fn user_message(&self, flow: AuthFlow) -> String {
        match (flow, self.kind) {
            (AuthFlow::Login, AuthFailureKind::EmailNotConfirmed) => {
                messages::EMAIL_NOT_CONFIRMED.to_string()
            }
            (AuthFlow::Login, AuthFailureKind::InvalidCredentials) => {
                messages::INVALID_CREDENTIALS.to_string()
            }
            (AuthFlow::Signup, AuthFailureKind::AlreadyRegistered) => {
                messages::ALREADY_REGISTERED.to_string()
            }
            (AuthFlow::Login, _) => format!("{}{}", messages::LOGIN_FAILED_PREFIX, self.message),
            (AuthFlow::Signup, _) => format!("{}{}", messages::SIGNUP_FAILED_PREFIX, self.message),
            (AuthFlow::OAuthSignup, _) => {
                format!("{}{}", messages::OAUTH_SIGNUP_FAILED_PREFIX, self.message)
            }
        }
    }
}

fn kind_from_code(code: &str) -> Option<AuthFailureKind> {
    match code {
        "email_not_confirmed" => Some(AuthFailureKind::EmailNotConfirmed),
        "invalid_credentials" => Some(AuthFailureKind::InvalidCredentials),
        "user_already_exists" | "email_exists" => Some(AuthFailureKind::AlreadyRegistered),
        _ => None,
    }
}

fn kind_from_message(message: &str) -> AuthFailureKind {
    if message.contains("Email not confirmed") {
        AuthFailureKind::EmailNotConfirmed
    } else if message.contains("Invalid login credentials") {
        AuthFailureKind::InvalidCredentials
    } else if message.contains("User already registered") {
        AuthFailureKind::AlreadyRegistered
    } else {
        AuthFailureKind::Unrecognized
    }
}

/// A message rendered above a credential form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormMessage {
    Error(String),
    Success(String),
}

impl FormMessage {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Error(text) | Self::Success(text) => text,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Result of one credential form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Rejected locally; the identity provider was never contacted.
    Rejected(String),
    /// The identity provider refused the request.
    Failed(String),
    /// Accepted; show `notice`, then follow `redirect`.
    Succeeded {
        notice: String,
        redirect: DeferredRedirect,
    },
}

impl FormOutcome {
    /// Outcome for a provider failure during `flow`.
    #[must_use]
    pub fn failed(flow: AuthFlow, failure: &AuthFailure) -> Self {
        Self::Failed(failure.user_message(flow))
    }

    #[must_use]
    pub fn login_succeeded() -> Self {
        Self::Succeeded {
            notice: messages::LOGIN_SUCCEEDED.to_string(),
            redirect: DeferredRedirect {
                to: Destination::Home,
                after: LOGIN_REDIRECT_DELAY,
            },
        }
    }

    #[must_use]
    pub fn signup_succeeded() -> Self {
        Self::Succeeded {
            notice: messages::SIGNUP_SUCCEEDED.to_string(),
            redirect: DeferredRedirect {
                to: Destination::Login,
                after: SIGNUP_REDIRECT_DELAY,
            },
        }
    }

    #[must_use]
    pub fn message(&self) -> FormMessage {
        match self {
            Self::Rejected(text) | Self::Failed(text) => FormMessage::Error(text.clone()),
            Self::Succeeded { notice, .. } => FormMessage::Success(notice.clone()),
        }
    }

    #[must_use]
    pub const fn redirect(&self) -> Option<DeferredRedirect> {
        match self {
            Self::Succeeded { redirect, .. } => Some(*redirect),
            Self::Rejected(_) | Self::Failed(_) => None,
        }
    }
}

/// Pre-submit check for the signup form.
///
/// # Errors
///
/// Returns `FormOutcome::Rejected` with the mismatch message when the two
/// passwords differ.
pub fn confirm_password(password: &str, confirmation: &str) -> Result<(), FormOutcome> {
    if password == confirmation {
        Ok(())
    } else {
        Err(FormOutcome::Rejected(messages::PASSWORD_MISMATCH.to_string()))
    }
}

/// Whether a password field shows its contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordVisibility {
    #[default]
    Hidden,
    Shown,
}

impl PasswordVisibility {
    /// Read the form's `show_password` checkbox.
    #[must_use]
    pub fn from_flag(shown: bool) -> Self {
        if shown { Self::Shown } else { Self::Hidden }
    }

    #[must_use]
    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Shown)
    }

    /// HTML `type` attribute for the password input.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Hidden => "password",
            Self::Shown => "text",
        }
    }

    /// Icon on the toggle button.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Hidden => "👁️",
            Self::Shown => "🙈",
        }
    }
}
