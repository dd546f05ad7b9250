//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! techstore products list --search lap --category laptops --page 2
//! techstore products show 12
//! techstore products categories
//! ```

use clap::Subcommand;

use techstore_core::{Item, ItemId};
use techstore_storefront::AppState;
use techstore_storefront::catalog::CategoryFilter;
use techstore_storefront::error::{AppError, Result};

use super::{find_item, load_catalog, money};

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List one page of products
    List {
        /// Case-insensitive text to look for in name, description, category or brand
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only show this category ("all" for every category)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Show every field of one product
    Show {
        /// Product id
        id: String,
    },
    /// List the categories in use
    Categories,
}

#[allow(clippy::print_stdout)]
pub async fn run(action: ProductsAction, state: &mut AppState) -> Result<()> {
    load_catalog(state).await?;

    match action {
        ProductsAction::List {
            search,
            category,
            page,
        } => list(state, search, &category, page),
        ProductsAction::Show { id } => {
            let item = find_item(state, &ItemId::from(id))?;
            print_item(&item);
            Ok(())
        }
        ProductsAction::Categories => {
            for category in state.catalog().categories() {
                println!("{category}");
            }
            Ok(())
        }
    }
}

#[allow(clippy::print_stdout)]
fn list(state: &mut AppState, search: String, category: &str, page: usize) -> Result<()> {
    let catalog = state.catalog_mut();
    catalog.set_search(search);
    catalog.set_category(CategoryFilter::parse(category));

    if catalog.filtered().is_empty() {
        println!("No products found");
        return Ok(());
    }
    if !catalog.set_page(page) {
        return Err(AppError::BadRequest(format!(
            "page {page} is out of range 1-{}",
            catalog.total_pages()
        )));
    }

    for item in catalog.paginated() {
        println!("{}", summary_line(item));
    }

    let summary = catalog.page_summary();
    println!();
    println!(
        "Showing {} - {} of {} products",
        summary.first, summary.last, summary.total_items
    );
    if catalog.shows_pagination() {
        let pages: Vec<String> = catalog
            .page_window()
            .map(|n| {
                if n == summary.page {
                    format!("[{n}]")
                } else {
                    n.to_string()
                }
            })
            .collect();
        println!("Pages: {} (of {})", pages.join(" "), summary.total_pages);
    }
    Ok(())
}

fn summary_line(item: &Item) -> String {
    format!(
        "{:>6}  {:<32}  {:<14}  {:>16}  {}",
        item.id,
        item.name,
        item.category,
        money(item.price),
        item.stock_status().label()
    )
}

#[allow(clippy::print_stdout)]
fn print_item(item: &Item) {
    println!("{} ({})", item.name, item.id);
    println!("  Category:    {}", item.category);
    if let Some(brand) = &item.brand {
        println!("  Brand:       {brand}");
    }
    println!("  Price:       {}", money(item.price));
    println!(
        "  Stock:       {} ({})",
        item.stock,
        item.stock_status().label()
    );
    println!("  Rating:      {:.1}", item.rating);
    println!(
        "  Available:   {}",
        if item.available { "yes" } else { "no" }
    );
    println!("  Image:       {}", item.image_url);
    println!("  Description: {}", item.description);
    if let Some(features) = &item.features {
        println!("  Features:    {features}");
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use techstore_core::ItemDraft;

    use super::*;

    #[test]
    fn test_summary_line_shows_status() {
        let item = ItemDraft {
            name: "Mouse".to_string(),
            price: Decimal::from(15_000),
            category: "accessories".to_string(),
            stock: 0,
            ..ItemDraft::default()
        }
        .into_item(ItemId::from("4"));

        let line = summary_line(&item);
        assert!(line.contains("Mouse"));
        assert!(line.contains("$ 15.000,00"));
        assert!(line.ends_with(item.stock_status().label()));
    }
}
