//! Persisted key-value storage for per-user state.
//!
//! Two independent string slots are used:
//!
//! - [`keys::CART`] - the serialized cart line list
//! - [`keys::SESSION`] - the serialized session record
//!
//! Values are opaque strings; the stores own their serialization format and
//! decide what to do with content they cannot parse.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage keys.
pub mod keys {
    /// Key for the serialized cart lines.
    pub const CART: &str = "techstore_cart";

    /// Key for the serialized current session.
    pub const SESSION: &str = "techstore_user";
}

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized before writing.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Durable string-keyed storage.
///
/// Implementations use interior mutability so one instance can be shared by
/// the cart and auth stores.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` when the key was never written or was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
