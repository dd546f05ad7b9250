//! In-memory catalog used to drive stores in unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use reqwest::StatusCode;
use techstore_core::{Item, ItemDraft, ItemId};

use super::{CatalogApi, CatalogClientError};

#[derive(Default)]
pub struct InMemoryCatalog {
    items: Mutex<Vec<Item>>,
    next_id: AtomicUsize,
    failing: AtomicBool,
    list_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn with_items(drafts: Vec<ItemDraft>) -> Self {
        let catalog = Self::default();
        {
            let mut items = catalog.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            for draft in drafts {
                items.push(draft.into_item(catalog.allocate_id()));
            }
        }
        catalog
    }

    /// Make every subsequent call fail with a 500.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Change an item behind the store's back.
    pub fn set_remote_stock(&self, id: &ItemId, stock: u32) {
        if let Some(item) = self.lock().iter_mut().find(|i| &i.id == id) {
            item.stock = stock;
        }
    }

    pub fn remote_item(&self, id: &ItemId) -> Option<Item> {
        self.lock().iter().find(|i| &i.id == id).cloned()
    }

    fn allocate_id(&self) -> ItemId {
        ItemId::new((self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Item>> {
        self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), CatalogClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogClientError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "simulated failure".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(id: &ItemId) -> CatalogClientError {
        CatalogClientError::Status {
            status: StatusCode::NOT_FOUND,
            body: format!("no item {id}"),
        }
    }
}

impl CatalogApi for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<Item>, CatalogClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.lock().clone())
    }

    async fn get(&self, id: &ItemId) -> Result<Item, CatalogClientError> {
        self.check()?;
        self.remote_item(id).ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, draft: &ItemDraft) -> Result<Item, CatalogClientError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let item = draft.clone().into_item(self.allocate_id());
        self.lock().push(item.clone());
        Ok(item)
    }

    async fn replace(&self, id: &ItemId, draft: &ItemDraft) -> Result<Item, CatalogClientError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut items = self.lock();
        let slot = items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        *slot = draft.clone().into_item(id.clone());
        Ok(slot.clone())
    }

    async fn delete(&self, id: &ItemId) -> Result<(), CatalogClientError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut items = self.lock();
        let before = items.len();
        items.retain(|i| &i.id != id);
        if items.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
