pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Slot holding the serialized client collection.
pub const CLIENTS_KEY: &str = "banco_clientes";
/// Slot holding the username of the logged-in client.
pub const SESSION_KEY: &str = "banco_sesion";

/// Opaque key-value persistence. Each key holds one whole blob; there is no partial update.
pub trait BlobStore: Send + Sync {
    /// Returns `None` when nothing has been stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>>;
    /// Replaces the blob under `key` entirely.
    fn save(&self, key: &str, data: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
