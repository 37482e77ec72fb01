//! Content loaders for reading planner data from files.
//!
//! Every loader has a `load(path)` entry point and a `parse_*` function over
//! file contents, which is what the built-in content goes through.

pub mod catalog;
pub mod factory;
pub mod rules;

pub use catalog::{CatalogData, CatalogLoader, CharacterSheet, SheetSlot};
pub use factory::ContentFactory;
pub use rules::RulesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
