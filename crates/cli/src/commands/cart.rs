//! Shopping cart commands.
//!
//! # Usage
//!
//! ```bash
//! techstore cart add 12
//! techstore cart set 12 3
//! techstore cart dec 12
//! techstore cart show
//! techstore cart checkout
//! ```

use clap::Subcommand;

use techstore_core::ItemId;
use techstore_storefront::AppState;
use techstore_storefront::cart::CartStore;
use techstore_storefront::error::{AppError, Result};

use super::{find_item, load_catalog, money};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Set a product's quantity (0 or less removes it)
    Set {
        /// Product id
        id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Increase a product's quantity by one
    Inc {
        /// Product id
        id: String,
    },
    /// Decrease a product's quantity by one, down to 1
    Dec {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Buy the cart contents
    Checkout,
}

#[allow(clippy::print_stdout)]
pub async fn run(action: CartAction, state: &mut AppState) -> Result<()> {
    match action {
        CartAction::Show => {}
        CartAction::Add { id } => {
            load_catalog(state).await?;
            let item = find_item(state, &ItemId::from(id))?;
            if !state.cart().can_add_more(&item) {
                return Err(AppError::BadRequest(format!(
                    "No more stock available for {}",
                    item.name
                )));
            }
            state.cart_mut().add(&item);
            println!("Added {} to the cart", item.name);
        }
        CartAction::Remove { id } => {
            let id = in_cart(state.cart(), id)?;
            state.cart_mut().remove(&id);
        }
        CartAction::Set { id, quantity } => {
            let id = in_cart(state.cart(), id)?;
            state.cart_mut().set_quantity(&id, quantity);
        }
        CartAction::Inc { id } => {
            let id = in_cart(state.cart(), id)?;
            state.cart_mut().increment(&id);
        }
        CartAction::Dec { id } => {
            let id = in_cart(state.cart(), id)?;
            state.cart_mut().decrement(&id);
        }
        CartAction::Clear => {
            state.cart_mut().clear();
            println!("Cart cleared");
            return Ok(());
        }
        CartAction::Checkout => {
            let receipt = state.checkout().await?;
            println!(
                "Purchased {} items for {}",
                receipt.total_items, receipt.total
            );
            if !receipt.is_complete() {
                let ids: Vec<String> = receipt.failed.iter().map(ToString::to_string).collect();
                println!("Stock could not be updated for: {}", ids.join(", "));
            }
            return Ok(());
        }
    }

    print_cart(state.cart());
    Ok(())
}

fn in_cart(cart: &CartStore, id: String) -> Result<ItemId> {
    let id = ItemId::from(id);
    if cart.contains(&id) {
        Ok(id)
    } else {
        Err(AppError::NotFound(format!("product {id} in the cart")))
    }
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &CartStore) {
    if cart.is_empty() {
        println!("The cart is empty");
        return;
    }
    for line in cart.lines() {
        println!(
            "{:>6}  {:<32}  {:>3} x {:>14}  = {:>16}",
            line.id,
            line.name,
            line.quantity,
            money(line.price),
            money(line.line_total())
        );
    }
    println!();
    println!("{} items, total {}", cart.total_items(), cart.total());
}
