//! Page-level services for the storefront.
//!
//! # Services
//!
//! - [`session_gate`] - Resolves the visitor's session on page mount
//! - [`hydrator`] - Fetches products and banners for a mounted page
//! - [`credentials`] - Login and signup submissions

pub mod credentials;
pub mod hydrator;
pub mod session_gate;

pub use credentials::CredentialService;
pub use hydrator::ContentHydrator;
pub use session_gate::{GateOutcome, GateResolution, SessionGate, TokenUpdate};
