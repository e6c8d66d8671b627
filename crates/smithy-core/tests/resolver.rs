//! Resolver behaviour against the in-memory sandbox.
//!
//! Each test builds a small catalog and world, runs one top-level resolution
//! and checks the result, the diagnostic steps, and the sandbox's action log.

// Integration tests use unwrap extensively for clarity -- panicking on
// failure is the correct behavior in test code.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc,
    clippy::panic
)]

use std::sync::Arc;

use smithy_core::{ResolveError, Resolution, Resolver, Session, SmithyConfig};
use smithy_types::{ItemId, Position};
use smithy_world::{ActionRecord, Catalog, RecipeBook, RecipeBookBuilder, SimWorld, WorldRules};

// =============================================================================
// Helpers
// =============================================================================

/// Items and blocks every session needs: the workstation and the furnace.
fn base() -> RecipeBookBuilder {
    RecipeBook::builder()
        .items(&["crafting_table", "furnace"])
        .block("grass_block", None, &[])
        .block("crafting_table", Some("crafting_table"), &[])
        .block("furnace", Some("furnace"), &[])
}

/// The wooden tier: planks, sticks, table, and a table-only pickaxe.
fn wooden_tier(table_needs_workstation: bool) -> Arc<RecipeBook> {
    Arc::new(
        base()
            .items(&["oak_log", "oak_planks", "stick", "wooden_pickaxe"])
            .block("oak_log", Some("oak_log"), &[])
            .recipe("oak_planks", 4, &[("oak_log", 1)], false)
            .recipe("stick", 4, &[("oak_planks", 2)], false)
            .recipe("crafting_table", 1, &[("oak_planks", 4)], table_needs_workstation)
            .recipe("wooden_pickaxe", 1, &[("oak_planks", 3), ("stick", 2)], true)
            .build()
            .unwrap(),
    )
}

/// A flat grass world with the agent standing at the origin.
fn flat_world(catalog: &Arc<RecipeBook>) -> SimWorld {
    let grass = catalog.block_id("grass_block").unwrap();
    let mut sim = SimWorld::new(Arc::clone(catalog), WorldRules::default());
    sim.fill_layer(grass, 0, -8, 8);
    sim.set_position(Position::new(0, 1, 0));
    sim
}

fn resolve(
    catalog: &Arc<RecipeBook>,
    sim: &mut SimWorld,
    config: &SmithyConfig,
    item: &str,
    quantity: u32,
) -> Resolution {
    let mut session = Session::new(&**catalog, sim, config).unwrap();
    Resolver::new(&mut session).resolve_named(item, quantity)
}

fn crafted(sim: &SimWorld) -> Vec<(String, u32)> {
    sim.actions()
        .iter()
        .filter_map(|action| match action {
            ActionRecord::Craft { item, batches } => Some((item.clone(), *batches)),
            _ => None,
        })
        .collect()
}

fn first_index(sim: &SimWorld, predicate: impl Fn(&ActionRecord) -> bool) -> usize {
    sim.actions().iter().position(predicate).unwrap()
}

fn is_craft(action: &ActionRecord, name: &str) -> bool {
    matches!(action, ActionRecord::Craft { item, .. } if item == name)
}

fn places(sim: &SimWorld) -> usize {
    sim.actions()
        .iter()
        .filter(|a| matches!(a, ActionRecord::Place { .. }))
        .count()
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn already_held_is_a_no_op() {
    let catalog = wooden_tier(false);
    let mut sim = flat_world(&catalog);
    sim.give_named("stick", 5).unwrap();
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "stick", 5);

    assert!(resolution.succeeded());
    assert!(sim.actions().is_empty());
    assert_eq!(resolution.steps, vec![String::from("have 5/5 stick")]);
}

#[test]
fn mutual_recipes_fail_with_cycle() {
    let catalog = Arc::new(
        base()
            .items(&["alpha", "beta"])
            .recipe("alpha", 1, &[("beta", 1)], false)
            .recipe("beta", 1, &[("alpha", 1)], false)
            .build()
            .unwrap(),
    );
    let mut sim = flat_world(&catalog);
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "alpha", 1);

    match resolution.result {
        Err(ResolveError::CycleDetected { path }) => assert_eq!(path, "alpha -> beta -> alpha"),
        other => panic!("expected a cycle, got {other:?}"),
    }
    assert!(sim.actions().is_empty());
    assert!(resolution.steps.iter().any(|s| s.starts_with("cycle detected")));
}

#[test]
fn five_sticks_take_four_planks() {
    let catalog = wooden_tier(false);
    let mut sim = flat_world(&catalog);
    sim.give_named("oak_log", 1).unwrap();
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "stick", 5);

    assert!(resolution.succeeded());
    assert_eq!(
        crafted(&sim),
        vec![(String::from("oak_planks"), 1), (String::from("stick"), 2)]
    );
    assert_eq!(sim.held_named("stick"), 8);
    assert_eq!(sim.held_named("oak_planks"), 0);
    assert_eq!(sim.held_named("oak_log"), 0);
}

#[test]
fn ingredients_resolve_in_declared_order_before_the_craft() {
    let catalog = Arc::new(
        base()
            .items(&["iron_nugget", "iron_ingot", "oak_planks", "stick", "iron_pickaxe"])
            .recipe("iron_ingot", 1, &[("iron_nugget", 9)], false)
            .recipe("stick", 4, &[("oak_planks", 2)], false)
            .recipe("iron_pickaxe", 1, &[("iron_ingot", 3), ("stick", 2)], true)
            .build()
            .unwrap(),
    );
    let mut sim = flat_world(&catalog);
    sim.set_block_named(Position::new(1, 1, 0), "crafting_table").unwrap();
    sim.give_named("iron_nugget", 27).unwrap();
    sim.give_named("oak_planks", 2).unwrap();
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "iron_pickaxe", 1);

    assert!(resolution.succeeded(), "{:?}", resolution.result);
    assert_eq!(
        crafted(&sim),
        vec![
            (String::from("iron_ingot"), 3),
            (String::from("stick"), 1),
            (String::from("iron_pickaxe"), 1),
        ]
    );
    // The table was already there: nothing placed, nothing reclaimed.
    assert_eq!(places(&sim), 0);
    assert_eq!(sim.block_count_named("crafting_table"), 1);
}

// =============================================================================
// Workstation self-reference
// =============================================================================

#[test]
fn crafting_table_is_crafted_without_bootstrap() {
    let catalog = wooden_tier(false);
    let mut sim = flat_world(&catalog);
    sim.give_named("oak_planks", 4).unwrap();
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "crafting_table", 1);

    assert!(resolution.succeeded());
    assert_eq!(crafted(&sim), vec![(String::from("crafting_table"), 1)]);
    assert_eq!(places(&sim), 0);
    assert_eq!(sim.held_named("crafting_table"), 1);
}

#[test]
fn nominal_table_requirement_uses_a_table_in_reach() {
    let catalog = wooden_tier(true);
    let mut sim = flat_world(&catalog);
    sim.set_block_named(Position::new(-1, 1, 0), "crafting_table").unwrap();
    sim.give_named("oak_planks", 4).unwrap();
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "crafting_table", 1);

    assert!(resolution.succeeded());
    assert_eq!(places(&sim), 0);
    assert_eq!(sim.held_named("crafting_table"), 1);
    assert_eq!(sim.block_count_named("crafting_table"), 1);
}

#[test]
fn nominal_table_requirement_never_bootstraps_itself() {
    let catalog = wooden_tier(true);
    let mut sim = flat_world(&catalog);
    sim.give_named("oak_planks", 8).unwrap();
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "crafting_table", 1);

    // The executor refuses the grid craft; the resolver must not have tried
    // to craft or place another table to get around it.
    assert!(matches!(
        resolution.result,
        Err(ResolveError::Execution { .. })
    ));
    assert_eq!(places(&sim), 0);
    assert!(crafted(&sim).is_empty());
    assert_eq!(sim.held_named("oak_planks"), 8);
}

// =============================================================================
// End to end
// =============================================================================

#[test]
fn wooden_pickaxe_from_three_logs() {
    let catalog = wooden_tier(false);
    let mut sim = flat_world(&catalog);
    for pos in [
        Position::new(2, 1, 0),
        Position::new(0, 1, 2),
        Position::new(-2, 1, -1),
    ] {
        sim.set_block_named(pos, "oak_log").unwrap();
    }
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "wooden_pickaxe", 1);

    assert!(resolution.succeeded(), "{:?}\n{:#?}", resolution.result, resolution.steps);
    assert_eq!(sim.held_named("wooden_pickaxe"), 1);

    let first_dig = first_index(&sim, |a| matches!(a, ActionRecord::Dig { block, .. } if block == "oak_log"));
    let planks = first_index(&sim, |a| is_craft(a, "oak_planks"));
    let table = first_index(&sim, |a| is_craft(a, "crafting_table"));
    let place = first_index(&sim, |a| matches!(a, ActionRecord::Place { block, .. } if block == "crafting_table"));
    let stick = first_index(&sim, |a| is_craft(a, "stick"));
    let pickaxe = first_index(&sim, |a| is_craft(a, "wooden_pickaxe"));
    assert!(first_dig < planks);
    assert!(planks < table);
    assert!(table < place);
    assert!(place < stick);
    assert!(stick < pickaxe);

    // All three logs were needed: 4 planks for the table, 3 for the pickaxe,
    // 2 for sticks.
    assert_eq!(sim.block_count_named("oak_log"), 0);
    // The placed table was picked back up.
    assert_eq!(sim.block_count_named("crafting_table"), 0);
    assert_eq!(sim.held_named("crafting_table"), 1);
    assert!(matches!(
        sim.actions().last(),
        Some(ActionRecord::Dig { block, .. }) if block == "crafting_table"
    ));
    assert!(resolution.steps.iter().any(|s| s.starts_with("re-checking ingredients")));
}

#[test]
fn scattered_logs_reuse_the_placed_table() {
    let catalog = wooden_tier(false);
    let grass = catalog.block_id("grass_block").unwrap();
    let mut sim = SimWorld::new(Arc::clone(&catalog), WorldRules::default());
    sim.fill_layer(grass, 0, -40, 40);
    sim.set_position(Position::new(0, 1, 0));
    for x in [10, 20, 30] {
        sim.set_block_named(Position::new(x, 1, 0), "oak_log").unwrap();
    }
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "wooden_pickaxe", 1);

    assert!(resolution.succeeded(), "{:?}\n{:#?}", resolution.result, resolution.steps);
    assert_eq!(sim.held_named("wooden_pickaxe"), 1);
    // Gathering the last log leaves the table far behind; it is reused.
    let tables = crafted(&sim)
        .iter()
        .filter(|(item, _)| item == "crafting_table")
        .count();
    assert_eq!(tables, 1);
    assert_eq!(places(&sim), 1);
    assert!(resolution
        .steps
        .iter()
        .any(|s| s == "walked back to crafting_table at (11, 1, 0)"));
    assert_eq!(sim.block_count_named("oak_log"), 0);
    assert_eq!(sim.block_count_named("crafting_table"), 0);
    assert_eq!(sim.held_named("crafting_table"), 1);
}

#[test]
fn placed_table_stays_when_reclaim_is_off() {
    let catalog = wooden_tier(false);
    let mut sim = flat_world(&catalog);
    sim.give_named("oak_log", 3).unwrap();
    let mut config = SmithyConfig::default();
    config.resolver.reclaim_workstation = false;

    let resolution = resolve(&catalog, &mut sim, &config, "wooden_pickaxe", 1);

    assert!(resolution.succeeded());
    assert_eq!(sim.block_count_named("crafting_table"), 1);
    assert_eq!(sim.held_named("crafting_table"), 0);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn raw_items_fail_without_gathering() {
    let catalog = wooden_tier(false);
    let mut sim = flat_world(&catalog);
    sim.set_block_named(Position::new(2, 1, 0), "oak_log").unwrap();
    let mut config = SmithyConfig::default();
    config.resolver.gather_raw = false;

    let resolution = resolve(&catalog, &mut sim, &config, "oak_planks", 1);

    match resolution.result {
        Err(ResolveError::NoRecipe { item }) => assert_eq!(item, "oak_log"),
        other => panic!("expected NoRecipe, got {other:?}"),
    }
    assert!(sim.actions().is_empty());
}

#[test]
fn missing_raw_source_is_a_gather_error() {
    let catalog = wooden_tier(false);
    let mut sim = flat_world(&catalog);
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "stick", 1);

    assert!(matches!(
        resolution.result,
        Err(ResolveError::Gather { .. })
    ));
    assert!(crafted(&sim).is_empty());
}

#[test]
fn unknown_items_are_rejected() {
    let catalog = wooden_tier(false);
    let mut sim = flat_world(&catalog);
    let config = SmithyConfig::default();

    let resolution = resolve(&catalog, &mut sim, &config, "unobtainium", 1);
    assert!(matches!(
        resolution.result,
        Err(ResolveError::UnknownItem { .. })
    ));

    let mut session = Session::new(&*catalog, &mut sim, &config).unwrap();
    let resolution = Resolver::new(&mut session).resolve(ItemId(999), 1);
    match resolution.result {
        Err(ResolveError::UnknownItem { item }) => assert_eq!(item, "item#999"),
        other => panic!("expected UnknownItem, got {other:?}"),
    }
}
