//! Catalog: remote client, in-memory store and derived views.
//!
//! # Architecture
//!
//! - [`HttpCatalogClient`] talks to the remote collection (`reqwest`)
//! - [`CatalogStore`] holds the fetched items and the filter state
//! - [`filter`] has the pure search, category and pagination logic
//!
//! The store depends on the [`CatalogApi`] trait rather than the HTTP client,
//! so it can be driven by an in-memory catalog in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use techstore_storefront::catalog::{CatalogStore, HttpCatalogClient};
//!
//! let client = HttpCatalogClient::new(&config.catalog)?;
//! let mut catalog = CatalogStore::new(client);
//! catalog.load_all().await?;
//!
//! catalog.set_search("lap");
//! for item in catalog.paginated() {
//!     println!("{} {}", item.name, item.price);
//! }
//! ```

mod client;
mod conversions;
pub mod filter;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CatalogApi, CatalogClientError, HttpCatalogClient};
pub use filter::{CategoryFilter, FilterState, PAGE_SIZE, PageSummary};
pub use store::{CatalogStore, InventorySummary};

use techstore_core::ValidationError;
use thiserror::Error;

/// Errors surfaced by the catalog store.
///
/// Transport failures are deliberately opaque: the cause is logged where it
/// happens and only the failed operation is reported.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The draft broke one or more field rules; nothing was sent.
    #[error("validation failed: {}", format_violations(.0))]
    Validation(Vec<ValidationError>),

    /// The remote catalog call failed.
    #[error("could not {0}")]
    OperationFailed(&'static str),
}

fn format_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_rule() {
        let err = CatalogError::Validation(vec![
            ValidationError::NameRequired,
            ValidationError::PriceNotPositive,
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: name is required, price must be greater than 0"
        );
    }
}
