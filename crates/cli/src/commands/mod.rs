//! Subcommand implementations.
//!
//! Each group module exposes a clap `Subcommand` enum and a `run` function
//! driving the stores in [`AppState`].

pub mod admin;
pub mod auth;
pub mod cart;
pub mod products;

use rust_decimal::Decimal;

use techstore_core::{Item, ItemId, Price};
use techstore_storefront::AppState;
use techstore_storefront::error::{AppError, Result};
use techstore_storefront::services::auth::AuthError;

/// Fetch the catalog.
async fn load_catalog(state: &mut AppState) -> Result<()> {
    state.catalog_mut().load_all().await?;
    Ok(())
}

/// Look up a loaded item.
fn find_item(state: &AppState, id: &ItemId) -> Result<Item> {
    state
        .catalog()
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Fail unless the session holds the admin role.
fn require_admin(state: &AppState) -> Result<()> {
    if !state.auth().is_authenticated() {
        return Err(AuthError::NotAuthenticated.into());
    }
    if !state.auth().is_admin() {
        return Err(AppError::Forbidden("admin role required".to_string()));
    }
    Ok(())
}

fn money(amount: Decimal) -> String {
    Price::store(amount).to_string()
}
