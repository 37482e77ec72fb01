use planner_core::{Career, EquipSlot, Item, ItemId, ItemType, Side};
use planner_runtime::{EventType, NewLoadout, Planner};
use std::sync::{Arc, Mutex};

fn record(planner: &Planner) -> Arc<Mutex<Vec<EventType>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    planner.events().subscribe_all(move |event| {
        sink.lock().unwrap().push(event.event_type());
        Ok(())
    });
    log
}

/// Flipping both sides to the same career
///
/// 1. Side A selects Witch Hunter and edits it
/// 2. Side B selects Witch Hunter
/// 3. Side B gets its own loadout; edits on B never reach A
#[test]
fn sides_never_share_a_career_loadout() {
    let planner = Planner::builder().build();

    // ================================================================
    // Side A: select and edit
    // ================================================================
    let a = planner.select_career(Career::WitchHunter).expect("select A");
    planner.set_level(25).expect("level A");
    let gloves = Item::new(ItemId(1), "Gloves", ItemType::MediumArmor, EquipSlot::Gloves);
    planner
        .set_item(EquipSlot::Gloves, Some(gloves))
        .expect("gloves A");

    // ================================================================
    // Side B: same career, different loadout
    // ================================================================
    planner.set_active_side(Side::B).expect("side B");
    let b = planner.select_career(Career::WitchHunter).expect("select B");
    assert_ne!(a, b);
    assert_eq!(planner.side_loadout_id(Side::A).expect("A"), Some(a));
    assert_eq!(planner.side_loadout_id(Side::B).expect("B"), Some(b));

    planner.set_level(10).expect("level B");
    assert_eq!(planner.loadout(a).expect("A").level, 25);
    assert_eq!(planner.loadout(b).expect("B").level, 10);

    // ================================================================
    // Flipping back reuses each side's cached loadout
    // ================================================================
    planner.set_active_side(Side::A).expect("side A");
    assert_eq!(planner.select_career(Career::WitchHunter).expect("again"), a);
    planner.set_active_side(Side::B).expect("side B");
    assert_eq!(planner.select_career(Career::WitchHunter).expect("again"), b);
}

#[test]
fn reset_drift_is_undone_by_the_next_selection() {
    let planner = Planner::builder().build();
    let id = planner.select_career(Career::Engineer).expect("select");

    planner.reset_loadout(id).expect("reset");
    let reset = planner.loadout(id).expect("loadout");
    assert_eq!(reset.career, None);
    assert_eq!(reset.name, "Side A");

    planner.select_career(Career::Chosen).expect("other career");
    let log = record(&planner);
    assert_eq!(planner.select_career(Career::Engineer).expect("back"), id);
    assert_eq!(
        planner.loadout(id).expect("loadout").career,
        Some(Career::Engineer)
    );
    assert!(log.lock().unwrap().contains(&EventType::CareerChanged));
}

#[test]
fn assigning_a_loadout_shown_on_the_other_side_clones_it() {
    let planner = Planner::builder().build();
    let shared = planner
        .create_loadout(NewLoadout::named("Shared"))
        .expect("create");
    planner.assign_side(Side::A, Some(shared)).expect("assign A");

    let log = record(&planner);
    let assigned = planner
        .assign_side(Side::B, Some(shared))
        .expect("assign B")
        .expect("B shows a loadout");

    assert_ne!(assigned, shared);
    assert_eq!(planner.loadout(assigned).expect("clone").name, "Shared (copy)");
    assert_eq!(
        *log.lock().unwrap(),
        [EventType::LoadoutCreated, EventType::SideAssigned]
    );
}

#[test]
fn removing_a_shown_loadout_clears_its_side() {
    let planner = Planner::builder().build();
    let a = planner.ensure_side(Side::A).expect("A");
    let b = planner.ensure_side(Side::B).expect("B");
    planner.switch_loadout(b).expect("switch");

    planner.remove_loadout(b).expect("remove");
    assert_eq!(planner.side_loadout_id(Side::B).expect("B"), None);
    assert_eq!(planner.current_loadout_id().expect("current"), Some(a));
    assert_eq!(planner.compare_sides().expect("compare"), None);
}
