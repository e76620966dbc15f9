//! Core types for EasyShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod rating;

pub use email::Email;
pub use id::*;
pub use price::{Price, PriceError};
pub use rating::{Rating, RatingError};
