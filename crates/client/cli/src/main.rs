//! Command-line entry point: imports two characters and compares them.
mod config;
mod report;

use std::sync::Arc;

use anyhow::{Context, Result};
use config::CliConfig;
use planner_content::ContentFactory;
use planner_core::Side;
use planner_runtime::{CharacterImporter, InMemoryCatalog, Planner};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    setup_logging();

    let content = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::builtin(),
    };
    let tables = content.load_rules().context("failed to load rules tables")?;
    let data = content.load_catalog().context("failed to load catalog")?;
    let catalog = InMemoryCatalog::from_content(&data)
        .context("catalog references unknown items")?
        .with_latency(config.catalog_latency);

    let planner = Planner::builder()
        .config(config.runtime.clone())
        .tables(tables)
        .url_sync(|query: &str| tracing::debug!(%query, "url updated"))
        .build();
    spawn_event_log(&planner);

    let importer = CharacterImporter::new(planner.clone(), Arc::new(catalog));
    for side in Side::BOTH {
        planner.set_active_side(side)?;
        let name = &config.characters[side];
        let imported = importer
            .load_from_named_character(name)
            .await
            .with_context(|| format!("failed to import {name:?} into side {side}"))?;
        report::print_import(&imported);
    }

    for side in Side::BOTH {
        if let Some(id) = planner.side_loadout_id(side)? {
            report::print_side(&planner, side, id)?;
        }
    }
    if let Some(comparison) = planner.compare_sides()? {
        report::print_comparison(&planner, &comparison)?;
    }
    println!("\nurl: ?{}", planner.url_query()?);

    Ok(())
}

/// Logs to stderr; `RUST_LOG` overrides the default `info` level.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

/// Dumps every planner event as JSON at trace level.
fn spawn_event_log(planner: &Planner) {
    let mut stream = planner.events().stream();
    tokio::spawn(async move {
        loop {
            match stream.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => tracing::trace!(target: "planner::events", %json),
                    Err(err) => tracing::warn!(error = %err, "failed to serialize event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event log lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
