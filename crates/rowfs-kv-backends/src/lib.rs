//! Store backends implementing the rowfs-kv contract.

mod memstore;

pub use memstore::MemStore;
