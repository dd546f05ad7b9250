//! TechStore storefront library.
//!
//! The catalog, cart and session stores of the TechStore shop, together with
//! the remote catalog client and the persisted storage they sit on. The
//! `techstore` binary in `techstore-cli` is a thin consumer of this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod busy;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

pub use state::AppState;
