//! EasyShop Core - Shared domain types and view policies.
//!
//! This crate holds everything about the storefront that can be decided
//! without talking to the outside world:
//! - which products and banners a page shows (live rows or placeholders)
//! - how the visitor's display name is derived from a session
//! - how a page's view state evolves after mount
//! - how identity-provider failures become user-facing messages
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async runtime. The `storefront` crate wires these policies to
//! the hosted backend and to axum.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, prices and ratings
//! - [`catalog`] - Products, banners, placeholder content and search
//! - [`session`] - Session projection and display-name derivation
//! - [`view`] - Per-mount view state and liveness tokens
//! - [`auth`] - Credential form outcomes and error classification
//! - [`locale`] - Header labels for the two supported languages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod locale;
pub mod session;
pub mod types;
pub mod view;

pub use auth::{AuthFailure, AuthFlow, DeferredRedirect, Destination, FormMessage, FormOutcome};
pub use catalog::{Banner, Product};
pub use locale::Locale;
pub use session::SessionView;
pub use types::*;
pub use view::{Liveness, Mount, ViewState};
