//! Read-only projection of the visitor's identity session.

use crate::types::Email;

/// Display name used when neither a username nor an email is available.
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// Cart badge count shown to signed-in visitors.
///
/// There is no cart entity behind it yet; the number is a fixed stand-in.
pub const PLACEHOLDER_CART_COUNT: u32 = 3;

/// What a page knows about the current visitor.
///
/// Rebuilt on every page mount from the identity provider's answer and never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub display_name: Option<String>,
    pub is_authenticated: bool,
}

impl SessionView {
    /// A visitor without a session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            display_name: None,
            is_authenticated: false,
        }
    }

    /// A signed-in visitor, named by [`display_name`].
    #[must_use]
    pub fn authenticated(username: Option<&str>, email: Option<&Email>) -> Self {
        Self {
            display_name: Some(display_name(username, email)),
            is_authenticated: true,
        }
    }
}

/// Derive the name shown in the header.
///
/// Profile username first, then the email's local part, then
/// [`FALLBACK_DISPLAY_NAME`]. Empty strings count as missing.
#[must_use]
pub fn display_name(username: Option<&str>, email: Option<&Email>) -> String {
    username
        .filter(|name| !name.is_empty())
        .or_else(|| email.map(Email::local_part).filter(|local| !local.is_empty()))
        .unwrap_or(FALLBACK_DISPLAY_NAME)
        .to_string()
}
