//! CLI configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use planner_core::{Side, SideMap};
use planner_runtime::RuntimeConfig;

/// Configuration required to run a side-by-side comparison.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub runtime: RuntimeConfig,
    /// Content directory; the embedded data is used when unset.
    pub data_dir: Option<PathBuf>,
    /// Character imported into each side.
    pub characters: SideMap<String>,
    pub catalog_latency: Duration,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            data_dir: None,
            characters: SideMap {
                a: "Vexilla".to_string(),
                b: "Gorthak".to_string(),
            },
            catalog_latency: Duration::ZERO,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PLANNER_DATA_DIR` - Content directory (default: embedded data)
    /// - `PLANNER_ITEM_CACHE` - Item cache capacity (default: 200)
    /// - `PLANNER_EVENT_BUFFER` - Event stream buffer (default: 100)
    /// - `PLANNER_SIDE_A` / `PLANNER_SIDE_B` - Characters to import
    /// - `PLANNER_CATALOG_LATENCY_MS` - Simulated catalog latency (default: 0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.data_dir = env::var_os("PLANNER_DATA_DIR").map(PathBuf::from);

        if let Some(capacity) = read_env::<usize>("PLANNER_ITEM_CACHE") {
            config.runtime.item_cache_capacity = capacity.max(1);
        }

        if let Some(capacity) = read_env::<usize>("PLANNER_EVENT_BUFFER") {
            config.runtime.event_buffer_size = capacity.max(1);
        }

        for (side, key) in [(Side::A, "PLANNER_SIDE_A"), (Side::B, "PLANNER_SIDE_B")] {
            if let Ok(name) = env::var(key)
                && !name.trim().is_empty()
            {
                config.characters[side] = name.trim().to_string();
            }
        }

        if let Some(millis) = read_env::<u64>("PLANNER_CATALOG_LATENCY_MS") {
            config.catalog_latency = Duration::from_millis(millis);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
