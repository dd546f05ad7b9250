//! Catalog store: the in-memory item list and its derived views.

use std::collections::HashSet;

use tracing::{debug, instrument};

use techstore_core::{Item, ItemDraft, ItemId};

use super::CatalogError;
use crate::busy::Busy;
use super::client::{CatalogApi, CatalogClientError};
use super::filter::{self, CategoryFilter, FilterState, PageSummary};

/// Stock counts shown on the admin screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InventorySummary {
    pub total: usize,
    /// Items with any stock left, low stock included.
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

/// Items fetched from the remote catalog plus the current filter state.
///
/// Writes go to the remote service first. Create and update re-fetch the
/// full list afterwards; delete removes the entry locally.
pub struct CatalogStore<C> {
    client: C,
    items: Vec<Item>,
    filter: FilterState,
    loading: bool,
    error: Option<String>,
}

impl<C: CatalogApi> CatalogStore<C> {
    /// Create an empty store. Call [`Self::load_all`] to populate it.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            items: Vec::new(),
            filter: FilterState::default(),
            loading: false,
            error: None,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// True while a remote call is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed load, cleared by the next attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// Replace the in-memory list with the remote one.
    ///
    /// On failure the previous list is kept and [`Self::error`] is set.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OperationFailed` if the fetch fails.
    #[instrument(skip_all)]
    pub async fn load_all(&mut self) -> Result<(), CatalogError> {
        self.error = None;
        let result = {
            let _busy = Busy::new(&mut self.loading);
            self.client.list().await
        };

        match result {
            Ok(items) => {
                tracing::info!(count = items.len(), "Catalog loaded");
                self.items = items;
                Ok(())
            }
            Err(e) => {
                let err = operation_failed("load products", &e);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Validate and create an item, then reload the catalog.
    ///
    /// A failed reload after a successful create is recorded in
    /// [`Self::error`] but does not fail the create.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` without contacting the service if the
    /// draft is invalid, or `CatalogError::OperationFailed` if the create fails.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create(&mut self, draft: ItemDraft) -> Result<Item, CatalogError> {
        draft.validate().map_err(CatalogError::Validation)?;

        let result = {
            let _busy = Busy::new(&mut self.loading);
            self.client.create(&draft).await
        };

        let created = result.map_err(|e| operation_failed("create product", &e))?;
        tracing::info!(id = %created.id, "Product created");

        if let Err(e) = self.load_all().await {
            debug!(error = %e, "Reload after create failed");
        }
        Ok(created)
    }

    /// Validate and fully replace an item, then reload the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` without contacting the service if the
    /// draft is invalid, or `CatalogError::OperationFailed` if the update fails.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update(&mut self, id: &ItemId, draft: ItemDraft) -> Result<Item, CatalogError> {
        draft.validate().map_err(CatalogError::Validation)?;

        let result = {
            let _busy = Busy::new(&mut self.loading);
            self.client.replace(id, &draft).await
        };

        let updated = result.map_err(|e| operation_failed("update product", &e))?;
        tracing::info!(id = %id, "Product updated");

        if let Err(e) = self.load_all().await {
            debug!(error = %e, "Reload after update failed");
        }
        Ok(updated)
    }

    /// Delete an item remotely, then drop it from the local list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OperationFailed` if the delete fails; the local
    /// list is left untouched.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&mut self, id: &ItemId) -> Result<(), CatalogError> {
        let result = {
            let _busy = Busy::new(&mut self.loading);
            self.client.delete(id).await
        };

        result.map_err(|e| operation_failed("delete product", &e))?;
        self.items.retain(|item| &item.id != id);
        tracing::info!(id = %id, "Product deleted");
        Ok(())
    }

    // =========================================================================
    // Filtering and Pagination
    // =========================================================================

    /// Set the search term; returns to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term);
    }

    /// Set the category; returns to page 1.
    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filter.set_category(category);
    }

    /// Move to a page. Returns `false` and keeps the current page when `page`
    /// is outside `1..=total_pages()`.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.filter.set_page_unchecked(page);
        true
    }

    /// Items matching the current category and search term.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .collect()
    }

    /// The current page of [`Self::filtered`].
    #[must_use]
    pub fn paginated(&self) -> Vec<&Item> {
        filter::page_slice(&self.filtered(), self.filter.page()).to_vec()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        filter::total_pages(self.filtered().len())
    }

    /// Pagination controls are only shown for more than one page.
    #[must_use]
    pub fn shows_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    #[must_use]
    pub fn page_summary(&self) -> PageSummary {
        PageSummary::new(self.filter.page(), self.filtered().len())
    }

    /// Page numbers to offer around the current page.
    #[must_use]
    pub fn page_window(&self) -> std::ops::RangeInclusive<usize> {
        filter::page_window(self.filter.page(), self.total_pages())
    }

    /// Distinct non-empty categories, in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .filter(|category| !category.is_empty() && seen.insert(*category))
            .collect()
    }

    #[must_use]
    pub fn inventory_summary(&self) -> InventorySummary {
        self.items
            .iter()
            .fold(InventorySummary::default(), |mut summary, item| {
                summary.total += 1;
                match item.stock {
                    0 => summary.out_of_stock += 1,
                    n => {
                        summary.in_stock += 1;
                        if n <= techstore_core::StockStatus::LOW_STOCK_THRESHOLD {
                            summary.low_stock += 1;
                        }
                    }
                }
                summary
            })
    }
}

/// Log a transport failure and reduce it to the opaque store error.
fn operation_failed(operation: &'static str, cause: &CatalogClientError) -> CatalogError {
    tracing::error!(operation, error = %cause, "Catalog operation failed");
    CatalogError::OperationFailed(operation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use techstore_core::ValidationError;

    use super::*;
    use crate::catalog::testing::InMemoryCatalog;

    fn draft(name: &str, category: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            description: format!("{name} with a long enough description"),
            price: Decimal::new(1000, 0),
            category: category.to_string(),
            brand: None,
            image_url: "https://img.example/x.png".to_string(),
            stock: 10,
            rating: 4.0,
            available: true,
            features: None,
        }
    }

    async fn store_with(drafts: Vec<ItemDraft>) -> CatalogStore<InMemoryCatalog> {
        let mut store = CatalogStore::new(InMemoryCatalog::with_items(drafts));
        store.load_all().await.unwrap();
        store
    }

    fn seventeen_items() -> Vec<ItemDraft> {
        (1..=17)
            .map(|i| draft(&format!("Item {i}"), "misc"))
            .collect()
    }

    #[tokio::test]
    async fn test_load_all_replaces_items() {
        let store = store_with(vec![draft("Phone", "smartphones")]).await;
        assert_eq!(store.items().len(), 1);
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_items() {
        let mut store = store_with(vec![draft("Phone", "smartphones")]).await;
        store.client().set_failing(true);

        let err = store.load_all().await.unwrap_err();
        assert!(matches!(err, CatalogError::OperationFailed(_)));
        assert_eq!(store.items().len(), 1);
        assert!(store.error().is_some());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_first_load_failure_leaves_empty() {
        let client = InMemoryCatalog::default();
        client.set_failing(true);
        let mut store = CatalogStore::new(client);

        assert!(store.load_all().await.is_err());
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_before_remote_call() {
        let mut store = store_with(vec![]).await;
        let bad = ItemDraft {
            name: String::new(),
            price: Decimal::ZERO,
            description: "short".to_string(),
            ..draft("x", "y")
        };

        let err = store.create(bad).await.unwrap_err();
        match err {
            CatalogError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.client().write_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_reloads_list() {
        let mut store = store_with(vec![draft("Phone", "smartphones")]).await;
        let list_calls = store.client().list_calls();

        let created = store.create(draft("Laptop", "laptops")).await.unwrap();

        assert_eq!(store.client().list_calls(), list_calls + 1);
        assert_eq!(store.items().len(), 2);
        assert!(store.get(&created.id).is_some());
    }

    #[tokio::test]
    async fn test_create_transport_failure_is_opaque() {
        let mut store = store_with(vec![]).await;
        store.client().set_failing(true);

        let err = store.create(draft("Laptop", "laptops")).await.unwrap_err();
        assert_eq!(err.to_string(), "could not create product");
    }

    #[tokio::test]
    async fn test_update_replaces_and_reloads() {
        let mut store = store_with(vec![draft("Phone", "smartphones")]).await;
        let id = store.items()[0].id.clone();

        let mut changed = store.items()[0].to_draft();
        changed.price = Decimal::new(5, 0);
        store.update(&id, changed).await.unwrap();

        assert_eq!(store.get(&id).unwrap().price, Decimal::new(5, 0));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_draft() {
        let mut store = store_with(vec![draft("Phone", "smartphones")]).await;
        let id = store.items()[0].id.clone();
        let invalid = ItemDraft {
            description: "tiny".to_string(),
            ..store.items()[0].to_draft()
        };

        let err = store.update(&id, invalid).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ref e) if e == &[ValidationError::DescriptionTooShort { min: 10 }]
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_locally_without_reload() {
        let mut store = store_with(vec![draft("A item", "x"), draft("B item", "x")]).await;
        let id = store.items()[0].id.clone();
        let list_calls = store.client().list_calls();

        store.delete(&id).await.unwrap();

        assert_eq!(store.client().list_calls(), list_calls);
        assert_eq!(store.items().len(), 1);
        assert!(store.get(&id).is_none());
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_item() {
        let mut store = store_with(vec![draft("A item", "x")]).await;
        let id = store.items()[0].id.clone();
        store.client().set_failing(true);

        assert!(store.delete(&id).await.is_err());
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn test_search_and_category_filters() {
        let mut store = store_with(vec![
            draft("Laptop Pro", "laptops"),
            draft("Gaming Laptop", "gaming"),
            draft("Phone", "smartphones"),
            ItemDraft {
                brand: Some("Laplander".to_string()),
                ..draft("Headset", "audio")
            },
        ])
        .await;

        store.set_search("lap");
        let names: Vec<&str> = store.filtered().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop Pro", "Gaming Laptop", "Headset"]);

        store.set_category(CategoryFilter::parse("LAPTOPS"));
        let names: Vec<&str> = store.filtered().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop Pro"]);
    }

    #[tokio::test]
    async fn test_pagination_of_seventeen_items() {
        let mut store = store_with(seventeen_items()).await;

        assert_eq!(store.total_pages(), 3);
        assert!(store.shows_pagination());
        assert_eq!(store.paginated().len(), 8);

        assert!(store.set_page(3));
        assert_eq!(store.paginated().len(), 1);
        assert_eq!(store.paginated()[0].name, "Item 17");

        let summary = store.page_summary();
        assert_eq!((summary.first, summary.last, summary.total_items), (17, 17, 17));
    }

    #[tokio::test]
    async fn test_set_page_out_of_range() {
        let mut store = store_with(seventeen_items()).await;
        assert!(!store.set_page(0));
        assert!(!store.set_page(4));
        assert_eq!(store.filter().page(), 1);
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let mut store = store_with(seventeen_items()).await;
        store.set_page(2);
        store.set_search("item");
        assert_eq!(store.filter().page(), 1);
    }

    #[tokio::test]
    async fn test_single_page_hides_pagination() {
        let store = store_with(vec![draft("Phone", "smartphones")]).await;
        assert_eq!(store.total_pages(), 1);
        assert!(!store.shows_pagination());

        let empty = store_with(vec![]).await;
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.shows_pagination());
    }

    #[tokio::test]
    async fn test_categories_distinct_non_empty() {
        let store = store_with(vec![
            draft("A item", "laptops"),
            draft("B item", ""),
            draft("C item", "audio"),
            draft("D item", "laptops"),
        ])
        .await;

        assert_eq!(store.categories(), vec!["laptops", "audio"]);
    }

    #[tokio::test]
    async fn test_inventory_summary() {
        let store = store_with(vec![
            ItemDraft { stock: 0, ..draft("A item", "x") },
            ItemDraft { stock: 3, ..draft("B item", "x") },
            ItemDraft { stock: 50, ..draft("C item", "x") },
        ])
        .await;

        assert_eq!(
            store.inventory_summary(),
            InventorySummary {
                total: 3,
                in_stock: 2,
                low_stock: 1,
                out_of_stock: 1,
            }
        );
    }
}
