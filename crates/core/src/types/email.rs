//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An account email address as reported by the identity provider.
///
/// The provider owns validation, so any string it returns is accepted
/// as-is. The storefront only ever needs the local part, which feeds the
/// visitor's display name.
///
/// ## Examples
///
/// ```
/// use easyshop_core::Email;
///
/// let email = Email::new("jane@example.com");
/// assert_eq!(email.local_part(), "jane");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Wrap a provider-issued address.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns everything before the first `@`.
    ///
    /// An address without `@` is returned whole; one starting with `@`
    /// yields an empty local part.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Email {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
