//! Content files compiled into the crate.

pub const CAREERS_RON: &str = include_str!("../data/careers.ron");
pub const RENOWN_RON: &str = include_str!("../data/renown.ron");
pub const TWO_HANDED_TOML: &str = include_str!("../data/two_handed.toml");
pub const CATALOG_RON: &str = include_str!("../data/catalog.ron");
