use planner_content::ContentFactory;
use planner_core::{Career, Side};
use planner_runtime::{CharacterImporter, EventType, InMemoryCatalog, Planner};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn importer(catalog: InMemoryCatalog) -> (CharacterImporter, Arc<Mutex<Vec<String>>>) {
    let content = ContentFactory::builtin();
    let tables = content.load_rules().expect("builtin rules");
    let queries = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&queries);
    let planner = Planner::builder()
        .tables(tables)
        .url_sync(move |query: &str| sink.lock().unwrap().push(query.to_string()))
        .build();
    (CharacterImporter::new(planner, Arc::new(catalog)), queries)
}

fn demo_catalog() -> InMemoryCatalog {
    let data = ContentFactory::builtin()
        .load_catalog()
        .expect("builtin catalog");
    InMemoryCatalog::from_content(&data).expect("resolve sheets")
}

/// Two imports racing for the same side
///
/// 1. Vexilla's import starts first but the catalog answers slowly
/// 2. Gorthak's import starts second and finishes immediately
/// 3. The side keeps showing Gorthak; Vexilla's late finish fills its own
///    loadout without touching the side or the career cache
#[tokio::test(start_paused = true)]
async fn later_import_owns_the_side() {
    let catalog = demo_catalog().with_character_latency("Vexilla", Duration::from_millis(500));
    let (importer, _) = importer(catalog);
    let planner = importer.planner().clone();

    // ================================================================
    // Race both imports on the active side (A)
    // ================================================================
    let (slow, fast) = tokio::join!(
        importer.load_from_named_character("Vexilla"),
        importer.load_from_named_character("Gorthak"),
    );
    let slow = slow.expect("Vexilla import");
    let fast = fast.expect("Gorthak import");

    // ================================================================
    // The side shows the import that started last
    // ================================================================
    assert_eq!(slow.side, Side::A);
    assert_eq!(fast.side, Side::A);
    let shown = planner
        .side_loadout_id(Side::A)
        .expect("side")
        .expect("side A shows a loadout");
    assert_eq!(shown, fast.loadout);
    let shown = planner.loadout(shown).expect("shown loadout");
    assert_eq!(shown.character_name.as_deref(), Some("Gorthak"));
    assert_eq!(shown.career, Some(Career::Chosen));

    // ================================================================
    // The stale import filled its own loadout but cached nothing
    // ================================================================
    assert!(fast.career_cached);
    assert!(!slow.career_cached);
    assert_eq!(
        planner.career_cache(Side::A, Career::Chosen).expect("cache"),
        Some(fast.loadout)
    );
    assert_eq!(
        planner
            .career_cache(Side::A, Career::WitchHunter)
            .expect("cache"),
        None
    );
    let stale = planner.loadout(slow.loadout).expect("stale loadout");
    assert_eq!(stale.career, Some(Career::WitchHunter));
    assert_eq!(stale.character_name.as_deref(), Some("Vexilla"));
    assert!(stale.is_from_character);
}

#[tokio::test(start_paused = true)]
async fn failed_import_leaves_a_newer_claim_alone() {
    let catalog = demo_catalog().with_character_latency("Nobody", Duration::from_millis(200));
    let (importer, _) = importer(catalog);
    let planner = importer.planner().clone();

    let (missing, found) = tokio::join!(
        importer.load_from_named_character("Nobody"),
        importer.load_from_named_character("Thrain"),
    );
    assert!(missing.is_err());
    let found = found.expect("Thrain import");

    assert_eq!(
        planner.side_loadout_id(Side::A).expect("side"),
        Some(found.loadout)
    );
    assert_eq!(
        planner.current_loadout_id().expect("current"),
        Some(found.loadout)
    );
    // Side A's default loadout plus Thrain; the failed claim is gone.
    assert_eq!(planner.loadouts().expect("list").len(), 2);
}

/// Two overlapping imports that both fail
///
/// 1. Side A shows its default loadout
/// 2. Two lookups for unknown names claim the side one after the other
/// 3. Both fail, the earlier claim first; the side and the current pointer
///    end up back on the default loadout
#[tokio::test(start_paused = true)]
async fn stacked_failed_imports_restore_the_original_loadout() {
    let catalog = demo_catalog()
        .with_character_latency("Nobody1", Duration::from_millis(100))
        .with_character_latency("Nobody2", Duration::from_millis(300));
    let (importer, _) = importer(catalog);
    let planner = importer.planner().clone();
    let original = planner.ensure_side(Side::A).expect("side");

    let (first, second) = tokio::join!(
        importer.load_from_named_character("Nobody1"),
        importer.load_from_named_character("Nobody2"),
    );
    assert!(first.is_err());
    assert!(second.is_err());

    assert_eq!(
        planner.side_loadout_id(Side::A).expect("side"),
        Some(original)
    );
    assert_eq!(
        planner.current_loadout_id().expect("current"),
        Some(original)
    );
    assert_eq!(planner.loadouts().expect("list").len(), 1);
}

#[tokio::test]
async fn import_syncs_url_once_after_the_claim() {
    let (importer, queries) = importer(demo_catalog());
    let planner = importer.planner().clone();
    let loaded = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&loaded);
    planner
        .events()
        .subscribe(EventType::CharacterLoaded, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

    importer
        .load_from_named_character("Thrain")
        .await
        .expect("import");

    let queries = queries.lock().unwrap();
    // ensure_side, the claim, then the bulk scope closing.
    assert_eq!(queries.len(), 3);
    let last = queries.last().expect("final query");
    assert!(last.contains("a.c=ironbreaker"));
    assert!(last.contains("a.l=32"));
    assert_eq!(*loaded.lock().unwrap(), 1);
}
