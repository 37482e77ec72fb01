//! Plain-text output for imports and side comparisons.
use anyhow::Result;
use planner_core::{LoadoutId, Side, StatsOptions};
use planner_runtime::{ImportReport, Planner, SideComparison};

pub fn print_import(report: &ImportReport) {
    println!(
        "imported {} into side {} ({})",
        report.character_name, report.side, report.loadout
    );
    for skipped in &report.skipped {
        match skipped.talisman_index {
            Some(index) => println!(
                "  skipped talisman {} in {} socket {index}: {}",
                skipped.item, skipped.slot, skipped.reason
            ),
            None => println!(
                "  skipped {} in {}: {}",
                skipped.item, skipped.slot, skipped.reason
            ),
        }
    }
}

pub fn print_side(planner: &Planner, side: Side, id: LoadoutId) -> Result<()> {
    let loadout = planner.loadout(id)?;
    let career = loadout
        .career
        .map_or_else(|| "no career".to_string(), |career| career.to_string());
    println!(
        "\n== side {side}: {} ({career}, level {}, renown {}) ==",
        loadout.name, loadout.level, loadout.renown_rank
    );

    let stats = planner.stats(id, StatsOptions::default())?;
    for (stat, value) in stats.iter().filter(|(_, value)| *value != 0) {
        println!("  {:<24} {value:>6}", stat.key());
    }
    println!(
        "  renown points {}/{}",
        planner.renown_points_spent(id)?,
        planner.renown_spend_cap(id)?
    );
    Ok(())
}

/// Prints every differing stat with the sources behind side B's value.
pub fn print_comparison(planner: &Planner, comparison: &SideComparison) -> Result<()> {
    println!("\n== side A vs side B ==");
    if comparison.deltas.is_empty() {
        println!("  identical stats");
    }
    for delta in &comparison.deltas {
        println!(
            "  {:<24} {:>6} {:>6} ({:+})",
            delta.stat.key(),
            delta.left,
            delta.right,
            delta.delta()
        );
        for source in planner.contributions(comparison.b, delta.stat)? {
            let unit = if source.is_percentage { "%" } else { "" };
            println!(
                "      {} x{}: {}{unit}",
                source.source_name, source.instance_count, source.total_value
            );
        }
    }
    Ok(())
}
