//! Content factory for building rules tables and catalogs.

use std::path::{Path, PathBuf};

use planner_core::RulesTables;

use crate::builtin;
use crate::loaders::{CatalogData, CatalogLoader, LoadResult, RulesLoader};

/// Content factory that loads all planner content from a data directory, or
/// from the copies embedded in the crate.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── careers.ron
/// ├── renown.ron
/// ├── two_handed.toml
/// └── catalog.ron
/// ```
pub struct ContentFactory {
    data_dir: Option<PathBuf>,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// Creates a factory serving the embedded content.
    pub fn builtin() -> Self {
        Self { data_dir: None }
    }

    /// Load rules tables from `careers.ron`, `renown.ron` and `two_handed.toml`.
    pub fn load_rules(&self) -> LoadResult<RulesTables> {
        match &self.data_dir {
            Some(dir) => RulesLoader::load(
                &dir.join("careers.ron"),
                &dir.join("renown.ron"),
                &dir.join("two_handed.toml"),
            ),
            None => RulesLoader::assemble(
                builtin::CAREERS_RON,
                builtin::RENOWN_RON,
                builtin::TWO_HANDED_TOML,
            ),
        }
    }

    /// Load the item catalog and character sheets from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<CatalogData> {
        match &self.data_dir {
            Some(dir) => CatalogLoader::load(&dir.join("catalog.ron")),
            None => CatalogLoader::parse(builtin::CATALOG_RON),
        }
    }

    /// Returns the data directory path, `None` for embedded content.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}
