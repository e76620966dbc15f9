//! Server-side session models.
//!
//! Domain types live in `easyshop-core`. This module only holds what the
//! storefront keeps between requests in the visitor's session.

pub mod session;

pub use session::{OAuthOrigin, PendingOAuth, StoredTokens, keys as session_keys};
