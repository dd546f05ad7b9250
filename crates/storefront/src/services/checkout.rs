//! Checkout service.
//!
//! Verifies the cart against the stock recorded on its lines, then decrements
//! the remote stock of each purchased item, clears the cart and reloads the
//! catalog. There is no payment step and no transaction: a line whose stock
//! update fails is reported on the receipt and the others still go through.

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use techstore_core::{ItemId, Price};

use crate::cart::{CartLine, CartStore};
use crate::catalog::{CatalogApi, CatalogClientError, CatalogStore};
use crate::error::add_breadcrumb;

/// Reasons a checkout is refused before anything is changed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,

    /// Names of the lines asking for more than the recorded stock.
    #[error("not enough stock for: {}", .0.join(", "))]
    InsufficientStock(Vec<String>),
}

/// Outcome of a completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub lines: Vec<CartLine>,
    pub total_items: u64,
    pub total: Price,
    /// Items whose remote stock could not be updated.
    pub failed: Vec<ItemId>,
}

impl CheckoutReceipt {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Check out the cart.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if there is nothing to buy, or
/// `CheckoutError::InsufficientStock` if any line exceeds its recorded stock.
/// Remote failures while updating stock are not errors; see
/// [`CheckoutReceipt::failed`].
#[instrument(skip_all, fields(lines = cart.lines().len()))]
pub async fn checkout<C: CatalogApi>(
    cart: &mut CartStore,
    catalog: &mut CatalogStore<C>,
) -> Result<CheckoutReceipt, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let short: Vec<String> = cart
        .lines()
        .iter()
        .filter(|line| line.quantity > line.stock)
        .map(|line| line.name.clone())
        .collect();
    if !short.is_empty() {
        warn!(items = ?short, "Checkout refused, insufficient stock");
        return Err(CheckoutError::InsufficientStock(short));
    }

    let lines = cart.lines().to_vec();
    let mut failed = Vec::new();
    for line in &lines {
        if let Err(e) = decrement_stock(catalog.client(), line).await {
            warn!(item_id = %line.id, error = %e, "Failed to update stock");
            failed.push(line.id.clone());
        }
    }

    let receipt = CheckoutReceipt {
        total_items: cart.total_items(),
        total: cart.total(),
        lines,
        failed,
    };

    cart.clear();
    if let Err(e) = catalog.load_all().await {
        debug!(error = %e, "Reload after checkout failed");
    }

    add_breadcrumb("checkout", "Checkout completed", None);
    info!(
        items = receipt.total_items,
        total = %receipt.total,
        failed = receipt.failed.len(),
        "Checkout completed"
    );
    Ok(receipt)
}

/// Fetch the live item and write it back with its stock reduced.
async fn decrement_stock<C: CatalogApi>(
    client: &C,
    line: &CartLine,
) -> Result<(), CatalogClientError> {
    let item = client.get(&line.id).await?;
    let mut draft = item.to_draft();
    draft.stock = item.stock.saturating_sub(line.quantity);
    client.replace(&line.id, &draft).await?;
    Ok(())
}
