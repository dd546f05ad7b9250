//! Core types for TechStore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod item;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{ItemId, UserId};
pub use item::{Item, ItemDraft, ValidationError};
pub use price::{CurrencyCode, Price};
pub use status::{Role, StockStatus};
