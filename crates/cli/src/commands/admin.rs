//! Catalog administration commands.
//!
//! Every command requires a logged-in admin session.
//!
//! # Usage
//!
//! ```bash
//! techstore admin stats
//! techstore admin create --name "Notebook Air" --description "Thin and light laptop" \
//!     --price 899999.99 --category laptops --image https://img.example/air.png --stock 12
//! techstore admin update 12 --price 849999 --stock 10
//! techstore admin delete 12
//! ```

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use techstore_core::{ItemDraft, ItemId};
use techstore_storefront::AppState;
use techstore_storefront::catalog::CatalogError;
use techstore_storefront::error::Result;

use super::{find_item, load_catalog, money, require_admin};

#[derive(Subcommand)]
pub enum AdminAction {
    /// Show inventory counts
    Stats,
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Replace the given fields of a product, keeping the rest
    Update {
        /// Product id
        id: String,

        #[command(flatten)]
        fields: ItemFields,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
}

/// Product form fields. Unset fields keep their current (or default) value.
#[derive(Args, Debug, Default)]
pub struct ItemFields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    price: Option<Decimal>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    /// Image URL
    #[arg(long)]
    image: Option<String>,

    #[arg(long)]
    stock: Option<u32>,

    /// Rating from 0 to 5
    #[arg(long)]
    rating: Option<f64>,

    /// Free-text feature list
    #[arg(long)]
    features: Option<String>,

    /// Mark the product as available or unavailable
    #[arg(long)]
    available: Option<bool>,
}

impl ItemFields {
    /// Overlay the given fields onto a draft.
    fn apply(self, mut draft: ItemDraft) -> ItemDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(brand) = self.brand {
            draft.brand = Some(brand).filter(|b| !b.trim().is_empty());
        }
        if let Some(image) = self.image {
            draft.image_url = image;
        }
        if let Some(stock) = self.stock {
            draft.stock = stock;
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
        if let Some(features) = self.features {
            draft.features = Some(features).filter(|f| !f.trim().is_empty());
        }
        if let Some(available) = self.available {
            draft.available = available;
        }
        draft
    }
}

#[allow(clippy::print_stdout)]
pub async fn run(action: AdminAction, state: &mut AppState) -> Result<()> {
    require_admin(state)?;
    load_catalog(state).await?;

    match action {
        AdminAction::Stats => {
            let summary = state.catalog().inventory_summary();
            println!("Total products: {}", summary.total);
            println!("In stock:       {}", summary.in_stock);
            println!("Low stock:      {}", summary.low_stock);
            println!("Out of stock:   {}", summary.out_of_stock);
            Ok(())
        }
        AdminAction::Create { fields } => {
            let draft = fields.apply(ItemDraft::default());
            draft.validate_full().map_err(CatalogError::Validation)?;

            let item = state.catalog_mut().create(draft).await?;
            tracing::info!(id = %item.id, "Product created");
            println!("Created {} ({}) at {}", item.name, item.id, money(item.price));
            Ok(())
        }
        AdminAction::Update { id, fields } => {
            let id = ItemId::from(id);
            let current = find_item(state, &id)?;
            let draft = fields.apply(current.to_draft());
            draft.validate_full().map_err(CatalogError::Validation)?;

            let item = state.catalog_mut().update(&id, draft).await?;
            tracing::info!(id = %item.id, "Product updated");
            println!("Updated {} ({})", item.name, item.id);
            Ok(())
        }
        AdminAction::Delete { id } => {
            let id = ItemId::from(id);
            let item = find_item(state, &id)?;
            state.catalog_mut().delete(&id).await?;
            tracing::info!(%id, "Product deleted");
            println!("Deleted {} ({id})", item.name);
            Ok(())
        }
    }
}
