//! Catalog client implementations and the item fetch path.
//!
//! [`InMemoryCatalog`] serves content data (the demo catalog or test
//! fixtures); [`ItemCache`] sits in front of any [`crate::CatalogClient`] for
//! item lookups by id.
mod cache;
mod memory;

pub use cache::ItemCache;
pub use memory::InMemoryCatalog;
