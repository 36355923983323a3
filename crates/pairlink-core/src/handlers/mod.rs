//! Stock capability implementations
//!
//! In-memory and storage-backed handlers used by default wiring and tests.

mod account_manager;
mod json_serializer;
mod list_store;
mod memory_storage;
mod peer_manager;

pub use account_manager::StorageAccountManager;
pub use json_serializer::JsonSerializer;
pub use memory_storage::MemoryStorage;
pub use peer_manager::StoragePeerManager;
