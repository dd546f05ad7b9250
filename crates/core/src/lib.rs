//! TechStore Core - Shared domain types.
//!
//! This crate provides the types used across all TechStore components:
//! - `storefront` - Catalog, cart and auth stores plus the remote catalog client
//! - `cli` - Command-line front end over the stores
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, roles and catalog items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
