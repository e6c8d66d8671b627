//! Workstation bootstrapping.
//!
//! [`ensure`] guarantees a crafting workstation within interaction range:
//! reuse one in reach, else walk back to a known one (the table this
//! resolution placed, or the nearest within the search radius), else place a
//! held one, else craft one through the resolver (with the caller's active
//! set, so the craft still takes part in cycle detection) and place it.
//! Placement tries [`PLACEMENT_OFFSETS`] in order and commits to the first
//! spot with solid ground and free space; any failure after that is final.

use smithy_types::{FaceVector, Position};
use tracing::{info, warn};

use crate::error::ResolveError;
use crate::resolver::{ActiveSet, Resolver};

/// Horizontal offsets from the agent tried, in order, when placing a workstation.
pub const PLACEMENT_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Make a workstation usable and return its position.
///
/// # Errors
///
/// [`ResolveError::WorkstationUnavailable`] when no table could be obtained or
/// no spot qualifies; [`ResolveError::Execution`] when the executor rejects the
/// equip or the placement.
pub fn ensure(resolver: &mut Resolver<'_, '_>, active: &ActiveSet) -> Result<Position, ResolveError> {
    let landmarks = resolver.session.landmarks();
    let table_name = resolver.session.item_name(landmarks.workstation_item);

    if let Some(pos) = resolver.session.workstation_nearby() {
        resolver.log.push(format!("{table_name} in reach at {pos}"));
        return Ok(pos);
    }

    if let Some(pos) = known_workstation(resolver) {
        return walk_to(resolver, pos, &table_name);
    }

    if resolver.session.held(landmarks.workstation_item) == 0 {
        resolver
            .log
            .push(format!("no {table_name} in reach or held; crafting one"));
        resolver
            .resolve_in(landmarks.workstation_item, 1, active)
            .map_err(|err| {
                warn!(%err, "Could not obtain a workstation");
                ResolveError::WorkstationUnavailable {
                    reason: format!("could not obtain {table_name}: {err}"),
                }
            })?;
    }

    let origin = resolver.session.agent().position();
    let Some((ground, target)) = placement_spot(resolver, origin) else {
        let reason = format!("no free spot next to {origin}");
        resolver.log.push(format!("cannot place {table_name}: {reason}"));
        return Err(ResolveError::WorkstationUnavailable { reason });
    };

    let handle = resolver
        .session
        .agent()
        .find(landmarks.workstation_item)
        .ok_or_else(|| ResolveError::WorkstationUnavailable {
            reason: format!("{table_name} vanished from the inventory"),
        })?;
    let agent = resolver.session.agent_mut();
    let placed = agent
        .equip(handle)
        .and_then(|()| agent.place(ground, FaceVector::UP));
    if let Err(source) = placed {
        resolver
            .log
            .push(format!("placing {table_name} at {target} failed: {source}"));
        return Err(ResolveError::Execution {
            action: format!("place {table_name}"),
            source,
        });
    }

    info!(item = %table_name, at = %target, "Workstation placed");
    resolver.log.push(format!("placed {table_name} at {target}"));
    resolver.placed_workstation = Some(target);
    Ok(target)
}

/// Dig back a workstation placed by the current resolution, if still in reach.
///
/// Failures are logged and otherwise ignored; the resolution already succeeded.
pub fn reclaim(resolver: &mut Resolver<'_, '_>) {
    let Some(pos) = resolver.placed_workstation.take() else {
        return;
    };
    let landmarks = resolver.session.landmarks();
    let table_name = resolver.session.item_name(landmarks.workstation_item);
    let still_there = resolver.session.agent().block_at(pos) == Some(landmarks.workstation_block);
    if !still_there || !resolver.session.in_reach(pos) {
        resolver.log.push(format!("left {table_name} at {pos}"));
        return;
    }
    match resolver.session.agent_mut().dig(pos) {
        Ok(()) => resolver.log.push(format!("picked up {table_name} from {pos}")),
        Err(err) => {
            warn!(%err, at = %pos, "Could not reclaim workstation");
            resolver
                .log
                .push(format!("could not pick up {table_name} at {pos}: {err}"));
        }
    }
}

/// A placed workstation out of reach: the one this resolution placed if it is
/// still standing, else the nearest within the search radius.
fn known_workstation(resolver: &Resolver<'_, '_>) -> Option<Position> {
    let block = resolver.session.landmarks().workstation_block;
    let agent = resolver.session.agent();
    resolver
        .placed_workstation
        .filter(|pos| agent.block_at(*pos) == Some(block))
        .or_else(|| agent.find_nearest(block, resolver.session.config().agent.search_radius))
}

/// Move next to the workstation at `pos`, onto the first free standing spot
/// around it, or onto the table itself when none qualifies.
fn walk_to(
    resolver: &mut Resolver<'_, '_>,
    pos: Position,
    table_name: &str,
) -> Result<Position, ResolveError> {
    let goal = placement_spot(resolver, pos).map_or(pos, |(_, spot)| spot);
    if let Err(source) = resolver.session.agent_mut().move_to(goal) {
        resolver
            .log
            .push(format!("could not walk back to {table_name} at {pos}: {source}"));
        return Err(ResolveError::Execution {
            action: format!("move to {table_name}"),
            source,
        });
    }
    info!(item = %table_name, at = %pos, "Returned to workstation");
    resolver
        .log
        .push(format!("walked back to {table_name} at {pos}"));
    Ok(pos)
}

/// First offset with solid ground below and nothing in the target cell.
fn placement_spot(resolver: &Resolver<'_, '_>, origin: Position) -> Option<(Position, Position)> {
    let agent = resolver.session.agent();
    PLACEMENT_OFFSETS.iter().find_map(|&(dx, dz)| {
        let ground = origin.offset(dx, -1, dz);
        let target = origin.offset(dx, 0, dz);
        (agent.block_at(ground).is_some() && agent.block_at(target).is_none())
            .then_some((ground, target))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use smithy_world::{ActionRecord, Catalog, RecipeBook, SimWorld, WorldRules};

    use super::*;
    use crate::config::SmithyConfig;
    use crate::session::Session;

    /// Table from planks; planks from logs, at a table when `planks_need_table`.
    fn catalog(planks_need_table: bool) -> Arc<RecipeBook> {
        Arc::new(
            RecipeBook::builder()
                .items(&["crafting_table", "furnace", "oak_log", "oak_planks"])
                .block("grass_block", None, &[])
                .block("crafting_table", Some("crafting_table"), &[])
                .block("furnace", Some("furnace"), &[])
                .recipe("oak_planks", 4, &[("oak_log", 1)], planks_need_table)
                .recipe("crafting_table", 1, &[("oak_planks", 4)], false)
                .build()
                .unwrap(),
        )
    }

    fn world(catalog: &Arc<RecipeBook>, ground: bool) -> SimWorld {
        let mut sim = SimWorld::new(Arc::clone(catalog), WorldRules::default());
        if ground {
            let grass = catalog.block_id("grass_block").unwrap();
            sim.fill_layer(grass, 0, -16, 16);
        }
        sim.set_position(Position::new(0, 1, 0));
        sim
    }

    fn crafts(sim: &SimWorld) -> usize {
        sim.actions()
            .iter()
            .filter(|a| matches!(a, ActionRecord::Craft { .. }))
            .count()
    }

    #[test]
    fn held_table_is_placed_without_crafting() {
        let catalog = catalog(false);
        let mut sim = world(&catalog, true);
        sim.give_named("crafting_table", 1).unwrap();
        let config = SmithyConfig::default();
        {
            let mut session = Session::new(&*catalog, &mut sim, &config).unwrap();
            let mut resolver = Resolver::new(&mut session);
            let pos = ensure(&mut resolver, &ActiveSet::new()).unwrap();
            assert_eq!(pos, Position::new(1, 1, 0));
            assert_eq!(resolver.placed_workstation, Some(pos));
        }
        assert_eq!(crafts(&sim), 0);
        assert_eq!(sim.held_named("crafting_table"), 0);
        assert_eq!(sim.block_count_named("crafting_table"), 1);
    }

    #[test]
    fn placement_takes_first_spot_with_ground_and_room() {
        let catalog = catalog(false);
        let mut sim = world(&catalog, false);
        // (1, 0) has ground but is blocked, (-1, 0) has no ground.
        sim.set_block_named(Position::new(1, 0, 0), "grass_block").unwrap();
        sim.set_block_named(Position::new(1, 1, 0), "grass_block").unwrap();
        sim.set_block_named(Position::new(0, 0, 1), "grass_block").unwrap();
        sim.set_block_named(Position::new(0, 0, -1), "grass_block").unwrap();
        sim.give_named("crafting_table", 1).unwrap();
        let config = SmithyConfig::default();

        let mut session = Session::new(&*catalog, &mut sim, &config).unwrap();
        let mut resolver = Resolver::new(&mut session);
        let pos = ensure(&mut resolver, &ActiveSet::new()).unwrap();

        assert_eq!(pos, Position::new(0, 1, 1));
    }

    #[test]
    fn no_ground_anywhere_is_unavailable() {
        let catalog = catalog(false);
        let mut sim = world(&catalog, false);
        sim.give_named("crafting_table", 1).unwrap();
        let config = SmithyConfig::default();
        {
            let mut session = Session::new(&*catalog, &mut sim, &config).unwrap();
            let mut resolver = Resolver::new(&mut session);
            let err = ensure(&mut resolver, &ActiveSet::new()).unwrap_err();
            assert!(matches!(err, ResolveError::WorkstationUnavailable { .. }));
            assert!(resolver
                .log
                .steps()
                .iter()
                .any(|s| s.starts_with("cannot place crafting_table")));
        }
        assert_eq!(sim.held_named("crafting_table"), 1);
        assert!(sim.actions().is_empty());
    }

    #[test]
    fn cycle_through_the_table_terminates() {
        let catalog = catalog(true);
        let mut sim = world(&catalog, true);
        sim.give_named("oak_log", 4).unwrap();
        let config = SmithyConfig::default();

        let resolution = {
            let mut session = Session::new(&*catalog, &mut sim, &config).unwrap();
            Resolver::new(&mut session).resolve_named("oak_planks", 4)
        };

        match resolution.result {
            Err(ResolveError::WorkstationUnavailable { reason }) => {
                assert!(reason.contains("cycle detected"), "{reason}");
            }
            other => panic!("expected WorkstationUnavailable, got {other:?}"),
        }
        assert!(resolution
            .steps
            .iter()
            .any(|s| s == "cycle detected: oak_planks -> crafting_table -> oak_planks"));
        assert!(sim.actions().is_empty());
        assert_eq!(sim.held_named("oak_log"), 4);
    }

    #[test]
    fn walks_back_to_a_table_out_of_reach() {
        let catalog = catalog(false);
        let mut sim = world(&catalog, true);
        sim.set_block_named(Position::new(10, 1, 0), "crafting_table").unwrap();
        sim.give_named("oak_planks", 4).unwrap();
        let config = SmithyConfig::default();
        {
            let mut session = Session::new(&*catalog, &mut sim, &config).unwrap();
            let mut resolver = Resolver::new(&mut session);
            let pos = ensure(&mut resolver, &ActiveSet::new()).unwrap();
            assert_eq!(pos, Position::new(10, 1, 0));
            assert_eq!(resolver.placed_workstation, None);
        }
        assert_eq!(
            sim.actions(),
            [ActionRecord::Move {
                to: Position::new(11, 1, 0)
            }]
        );
        assert_eq!(sim.held_named("oak_planks"), 4);
        assert_eq!(sim.block_count_named("crafting_table"), 1);
    }
}
